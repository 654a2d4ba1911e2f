//! BddFlow Rust Library
//!
//! Este crate actúa como la fachada de BddFlow:
//! - Re-exporta el motor (`bdd-core`): fachada `Flow`, receptor de registro,
//!   contexto compartido, eventos y errores.
//! - El binario `main-flow` muestra el motor corriendo de punta a punta.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub use bdd_core::{async_fn, create, sync_fn};
pub use bdd_core::{DescribeCtx, DescribeWrap, DoneFn, Flow, ItWrap, StepFn, WrapProps};
pub use bdd_core::{EventKind, FlowError, FlowEvent, StepResult};
pub use bdd_core::{OmitPattern, OmitRules, Role, SharedContext, StepContext};
