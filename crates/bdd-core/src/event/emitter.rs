//! Emisor de eventos: registro de suscriptores + log append-only.

use chrono::Utc;

use super::{EventKind, FlowEvent};

/// Callback de suscripción. Recibe el nombre del paso que emitió.
pub type EventHandler = Box<dyn FnMut(&str) + Send>;

/// Distribuye cada evento a los suscriptores de su clase y lo agrega al log
/// del run (orden ascendente por `seq`).
#[derive(Default)]
pub struct Emitter {
    handlers: Vec<(EventKind, EventHandler)>,
    log: Vec<FlowEvent>,
}

impl Emitter {
    pub(crate) fn on(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.push((kind, handler));
    }

    pub(crate) fn emit(&mut self, kind: EventKind, name: &str) {
        let seq = self.log.len() as u64;
        self.log.push(FlowEvent { seq,
                                  kind,
                                  name: name.to_string(),
                                  ts: Utc::now() });
        tracing::trace!(?kind, name, seq, "flow event");
        for (subscribed, handler) in self.handlers.iter_mut() {
            if *subscribed == kind {
                handler(name);
            }
        }
    }

    /// Vacía el log al comenzar un run nuevo. Los suscriptores se conservan.
    pub(crate) fn reset(&mut self) {
        self.log.clear();
    }

    /// Eventos emitidos por el run en curso o el último completado.
    pub fn events(&self) -> &[FlowEvent] {
        &self.log
    }
}
