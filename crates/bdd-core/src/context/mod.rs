//! Contexto compartido y su filtrado por rol.
//!
//! Rol en el flujo:
//! - Existe exactamente un contexto autoritativo por `Flow` en ejecución.
//! - Cada hook/describe/caso recibe una *vista* filtrada según su rol; al
//!   completar, sus mutaciones se fusionan de vuelta (también filtradas).
//! - Las reglas de `all` aplican a todos los roles, además de las del rol
//!   específico. Las claves con el prefijo reservado quedan fuera siempre.
//!
//! La fusión es shallow por clave: la última escritura gana, sin merge
//! profundo de objetos anidados.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::RESERVED_CONTEXT_PREFIX;

/// Rol bajo el que un paso observa el contexto compartido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    All,
    Describe,
    Hook,
    It,
    RootDescribe,
}

/// Patrón de exclusión de claves de contexto.
#[derive(Debug, Clone)]
pub struct OmitPattern(Regex);

impl OmitPattern {
    fn is_match(&self, key: &str) -> bool {
        self.0.is_match(key)
    }
}

impl From<Regex> for OmitPattern {
    fn from(re: Regex) -> Self {
        Self(re)
    }
}

impl From<&str> for OmitPattern {
    /// Una cadena literal se interpreta como coincidencia exacta de clave.
    fn from(key: &str) -> Self {
        let re = Regex::new(&format!("^{}$", regex::escape(key)))
            .expect("escaped literal is a valid regex");
        Self(re)
    }
}

impl From<String> for OmitPattern {
    fn from(key: String) -> Self {
        OmitPattern::from(key.as_str())
    }
}

static RESERVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}", regex::escape(RESERVED_CONTEXT_PREFIX)))
        .expect("escaped prefix is a valid regex")
});

/// Reglas de exclusión indexadas por rol.
#[derive(Debug, Clone, Default)]
pub struct OmitRules {
    all: Vec<OmitPattern>,
    describe: Vec<OmitPattern>,
    hook: Vec<OmitPattern>,
    it: Vec<OmitPattern>,
    root_describe: Vec<OmitPattern>,
}

impl OmitRules {
    /// Agrega una regla para `role`. Con `Role::All` la regla aplica a todo.
    pub fn hide(&mut self, role: Role, pattern: impl Into<OmitPattern>) {
        self.rules_mut(role).push(pattern.into());
    }

    fn rules_mut(&mut self, role: Role) -> &mut Vec<OmitPattern> {
        match role {
            Role::All => &mut self.all,
            Role::Describe => &mut self.describe,
            Role::Hook => &mut self.hook,
            Role::It => &mut self.it,
            Role::RootDescribe => &mut self.root_describe,
        }
    }

    fn rules(&self, role: Role) -> &[OmitPattern] {
        match role {
            Role::All => &[],
            Role::Describe => &self.describe,
            Role::Hook => &self.hook,
            Role::It => &self.it,
            Role::RootDescribe => &self.root_describe,
        }
    }

    /// `true` si la clave debe quedar fuera de la vista para `role`.
    pub(crate) fn omits(&self, role: Role, key: &str) -> bool {
        if RESERVED.is_match(key) {
            return true;
        }
        self.all
            .iter()
            .chain(self.rules(role).iter())
            .any(|p| p.is_match(key))
    }
}

/// Filtra un mapa de propiedades según las reglas de `role`.
pub(crate) fn filter_props(props: Map<String, Value>,
                           role: Role,
                           rules: &OmitRules)
                           -> Map<String, Value> {
    props.into_iter()
         .filter(|(key, _)| !rules.omits(role, key))
         .collect()
}

/// Mapa autoritativo clave→valor que viaja entre hooks, describes y casos a
/// lo largo de un run. Preserva el orden de inserción.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedContext {
    props: Map<String, Value>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(props: Map<String, Value>) -> Self {
        Self { props }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Vista filtrada por rol: copia de las claves que ninguna regla excluye.
    pub(crate) fn filtered(&self, role: Role, rules: &OmitRules) -> Map<String, Value> {
        self.props
            .iter()
            .filter(|(key, _)| !rules.omits(role, key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Fusiona `ext` sobre el contexto autoritativo, filtrando por rol.
    /// Escritura por clave, la última gana.
    pub(crate) fn extend_filtered(&mut self,
                                  ext: Map<String, Value>,
                                  role: Role,
                                  rules: &OmitRules) {
        for (key, value) in ext {
            if !rules.omits(role, &key) {
                self.props.insert(key, value);
            }
        }
    }
}

/// Vista mutable que recibe un hook o un caso mientras ejecuta. Sus
/// mutaciones vuelven al contexto autoritativo al completar la fase; los
/// metadatos del paso (nombre, path, profundidad) viajan como campos propios,
/// nunca como claves del mapa de usuario.
#[derive(Debug)]
pub struct StepContext {
    props: Map<String, Value>,
    name: Option<String>,
    path: Option<Vec<String>>,
    depth: usize,
}

impl StepContext {
    pub(crate) fn for_hook(props: Map<String, Value>, depth: usize) -> Self {
        Self { props,
               name: None,
               path: None,
               depth }
    }

    pub(crate) fn for_case(props: Map<String, Value>,
                           name: String,
                           path: Vec<String>,
                           depth: usize)
                           -> Self {
        Self { props,
               name: Some(name),
               path: Some(path),
               depth }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.props.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Nombre del caso en ejecución. `None` dentro de un hook.
    pub fn case_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Path completo del caso (nombres ancestro + nombre propio). `None`
    /// dentro de un hook.
    pub fn case_path(&self) -> Option<&[String]> {
        self.path.as_deref()
    }

    /// Profundidad actual de la pila de describes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Fusión cruda de propiedades aportadas por un wrapper de caso.
    pub(crate) fn merge_ext(&mut self, ext: Map<String, Value>) {
        for (key, value) in ext {
            self.props.insert(key, value);
        }
    }

    pub(crate) fn into_props(self) -> Map<String, Value> {
        self.props
    }
}
