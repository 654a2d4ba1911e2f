//! Constantes del motor core.
//!
//! Este módulo agrupa valores estáticos que participan en el contrato
//! observable del motor: el prefijo de claves reservadas del contexto y el
//! separador con el que se une el path de un caso para la selección.

/// Prefijo reservado para claves internas del contexto compartido. El filtro
/// de contexto excluye estas claves de toda vista, para cualquier rol y sin
/// importar las reglas configuradas por el usuario.
pub const RESERVED_CONTEXT_PREFIX: &str = "__bddflow__";

/// Separador usado al unir los nombres ancestro + nombre propio de un caso en
/// una sola cadena. Esa cadena es la que evalúan `grep` y `grepv`.
pub const PATH_SEPARATOR: &str = " ";
