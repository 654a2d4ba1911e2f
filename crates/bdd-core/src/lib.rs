//! bdd-core: motor determinista de flujos BDD (describe/it + hooks).
//!
//! Rol del crate:
//! - Registrar árboles de grupos (`describe`) y casos (`it`) con hooks
//!   `before`/`beforeEach`/`after`/`afterEach` por nivel.
//! - Ejecutarlos en orden estricto de registro, con concurrencia 1 entre
//!   hermanos, aceptando callbacks síncronos o asíncronos.
//! - Propagar un contexto compartido mutable entre pasos, filtrado por rol
//!   en cada frontera hook/describe/it.
//! - Seleccionar casos por path con `grep`/`grepv` y emitir eventos de ciclo
//!   de vida para un observador externo.
//!
//! No hay aserciones, reporteros ni carga de archivos acá: eso vive en el
//! anfitrión que consume esta API.

pub mod batch;
pub mod constants;
pub mod context;
pub mod engine;
pub mod errors;
pub mod event;
pub mod step;

pub use context::{OmitPattern, OmitRules, Role, SharedContext, StepContext};
pub use engine::{create, DescribeCtx, DoneFn, Flow};
pub use errors::{FlowError, StepResult};
pub use event::{EventKind, FlowEvent};
pub use step::{async_fn, sync_fn, DescribeWrap, HookKind, ItWrap, StepFn, WrapProps};
