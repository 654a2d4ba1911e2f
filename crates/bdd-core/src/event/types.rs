//! Tipos de evento de ciclo de vida y estructura `FlowEvent`.
//!
//! Rol en el flujo:
//! - El scheduler emite un evento en cada transición observable del árbol:
//!   entrada/salida de un `describe`, inicio/fin del cuerpo de un `it`.
//! - Los eventos llegan a los suscriptores registrados con `Flow::on` y
//!   quedan además en un log append-only consultable tras el run.
//! - Un caso descartado por la selección no emite eventos propios: sólo los
//!   cuerpos realmente ejecutados aparecen aquí.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clase de evento emitido durante un run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Un `describe` entró: su cuerpo de registro ya corrió y sus pasos están
    /// por comenzar. La profundidad ya fue incrementada.
    DescribePush,
    /// Un `describe` salió: su pasada terminó (con o sin error) y la
    /// profundidad fue decrementada.
    DescribePop,
    /// El cuerpo de un `it` está por ejecutar.
    ItPush,
    /// El cuerpo de un `it` completó y sus mutaciones ya se fusionaron.
    ItPop,
}

/// Evento registrado en el log del run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEvent {
    pub seq: u64, // orden de emisión dentro del run
    pub kind: EventKind,
    pub name: String,
    pub ts: DateTime<Utc>, // metadato, sin peso semántico
}
