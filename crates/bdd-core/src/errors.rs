//! Errores del motor (simples por ahora).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resultado de un hook, un caso o una fase completa del flujo.
pub type StepResult = Result<(), FlowError>;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum FlowError {
    /// Fallo señalado por un callback de usuario. El motor lo envuelve en
    /// `HookFailed` o `CaseFailed` en el punto donde ocurrió.
    #[error("step failed: {0}")]
    Step(String),
    /// Un hook (`before`, `beforeEach`, `after`, `afterEach`) reportó error.
    #[error("hook '{hook}' failed in describe '{describe}': {message}")]
    HookFailed {
        hook: String,
        describe: String,
        message: String,
    },
    /// El cuerpo de un caso `it` reportó error.
    #[error("case '{name}' failed: {message}")]
    CaseFailed { name: String, message: String },
    /// Error interno del motor.
    #[error("internal: {0}")]
    Internal(String),
}

impl FlowError {
    /// Atajo para que los callbacks señalen un fallo con mensaje.
    pub fn step(message: impl Into<String>) -> Self {
        FlowError::Step(message.into())
    }
}
