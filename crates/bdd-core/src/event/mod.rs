//! Eventos de ciclo de vida y su emisor.

mod emitter;
mod types;

pub use emitter::{Emitter, EventHandler};
pub use types::{EventKind, FlowEvent};
