//! Wrappers de inyección de contexto para `it` y `describe`.
//!
//! Un wrapper deja que el código anfitrión comparta estado con cada caso o
//! grupo sin tocar los cuerpos registrados: aporta propiedades de contexto o
//! toma control de la invocación del cuerpo.

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::errors::StepResult;

/// Propiedades extra aportadas por un wrapper.
pub type WrapProps = Map<String, Value>;

/// Wrapper opcional alrededor de cada caso `it`.
pub enum ItWrap {
    /// Aporta propiedades (fusión cruda sobre la vista del caso); el motor
    /// ejecuta el cuerpo como siempre.
    Inject(Box<dyn FnMut(&str) -> WrapProps + Send>),
    /// Recibe el nombre del caso y su cuerpo como futuro, y es responsable de
    /// ejecutarlo. La resolución del futuro devuelto señala el fin del caso.
    Drive(Box<dyn for<'a> FnMut(&'a str, BoxFuture<'a, StepResult>) -> BoxFuture<'a, StepResult>
              + Send>),
}

impl ItWrap {
    /// Construye un wrapper de inyección a partir de un cierre.
    pub fn inject(f: impl FnMut(&str) -> WrapProps + Send + 'static) -> Self {
        ItWrap::Inject(Box::new(f))
    }

    /// Construye un wrapper conductor a partir de un cierre.
    pub fn drive(f: impl for<'a> FnMut(&'a str, BoxFuture<'a, StepResult>) -> BoxFuture<'a, StepResult>
                     + Send
                     + 'static)
                 -> Self {
        ItWrap::Drive(Box::new(f))
    }
}

/// Wrapper opcional alrededor de cada cuerpo `describe`: aporta propiedades,
/// filtradas por el rol del grupo antes de entrar a la vista.
pub type DescribeWrap = Box<dyn FnMut(&str) -> WrapProps + Send>;
