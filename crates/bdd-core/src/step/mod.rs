//! Pasos del árbol de ejecución.
//!
//! Un paso registrado dentro de un `describe` es un caso hoja (`it`) o un
//! grupo anidado (`describe`). Este módulo define además:
//! - `StepFn`: el cuerpo de un hook o caso, con su capacidad declarada al
//!   registrar (`Sync` completa al retornar, `Async` cuando su futuro
//!   resuelve). No hay introspección de firmas en runtime.
//! - `HookSet`: los cuatro hooks opcionales de un nivel.
//! - Los wrappers de inyección de contexto (`wrap`).

mod wrap;

use futures::future::BoxFuture;

use crate::context::StepContext;
use crate::errors::StepResult;

pub use wrap::{DescribeWrap, ItWrap, WrapProps};

/// Callback síncrono de hook o caso.
pub type SyncFn = Box<dyn FnMut(&mut StepContext) -> StepResult + Send>;

/// Callback asíncrono: devuelve un futuro ligado al préstamo del contexto.
pub type AsyncFn =
    Box<dyn for<'a> FnMut(&'a mut StepContext) -> BoxFuture<'a, StepResult> + Send>;

/// Cuerpo de un hook o caso con su capacidad declarada en el registro.
pub enum StepFn {
    Sync(SyncFn),
    Async(AsyncFn),
}

impl StepFn {
    pub(crate) async fn call(&mut self, ctx: &mut StepContext) -> StepResult {
        match self {
            StepFn::Sync(f) => f(ctx),
            StepFn::Async(f) => f(ctx).await,
        }
    }

    /// Implementación por defecto de los hooks: completa de inmediato.
    pub(crate) fn noop() -> Self {
        sync_fn(|_| Ok(()))
    }
}

/// Envuelve un callback síncrono como cuerpo de hook o caso.
pub fn sync_fn(f: impl FnMut(&mut StepContext) -> StepResult + Send + 'static) -> StepFn {
    StepFn::Sync(Box::new(f))
}

/// Envuelve un callback asíncrono. El cierre debe devolver un futuro boxeado
/// sobre el contexto prestado, p. ej. `|ctx| Box::pin(async move { ... })`.
pub fn async_fn(f: impl for<'a> FnMut(&'a mut StepContext) -> BoxFuture<'a, StepResult>
                    + Send
                    + 'static)
                -> StepFn {
    StepFn::Async(Box::new(f))
}

/// Identifica uno de los cuatro hooks de un `describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Before,
    BeforeEach,
    After,
    AfterEach,
}

impl HookKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            HookKind::Before => "before",
            HookKind::BeforeEach => "beforeEach",
            HookKind::After => "after",
            HookKind::AfterEach => "afterEach",
        }
    }
}

/// Los cuatro hooks opcionales de un nivel `describe`. Cada slot se
/// sobreescribe a lo sumo una vez durante el cuerpo de registro.
pub struct HookSet {
    before: StepFn,
    before_each: StepFn,
    after: StepFn,
    after_each: StepFn,
}

impl Default for HookSet {
    fn default() -> Self {
        Self { before: StepFn::noop(),
               before_each: StepFn::noop(),
               after: StepFn::noop(),
               after_each: StepFn::noop() }
    }
}

impl HookSet {
    pub(crate) fn set(&mut self, kind: HookKind, f: StepFn) {
        *self.slot_mut(kind) = f;
    }

    pub(crate) fn slot_mut(&mut self, kind: HookKind) -> &mut StepFn {
        match kind {
            HookKind::Before => &mut self.before,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::After => &mut self.after,
            HookKind::AfterEach => &mut self.after_each,
        }
    }
}

/// Cuerpo de registro de un `describe`. Corre recién cuando al grupo le toca
/// ejecutar; `FnMut` para que un flujo pueda correrse más de una vez.
pub(crate) type DescribeBody = Box<dyn FnMut(&mut crate::engine::DescribeCtx<'_>) + Send>;

/// Caso hoja registrado con `it`.
pub(crate) struct ItStep {
    pub name: String,
    pub body: StepFn,
}

/// Grupo anidado registrado con `describe`.
pub(crate) struct DescribeStep {
    pub name: String,
    pub body: DescribeBody,
}

/// Paso de un nivel: hoja o sub-árbol, en orden de registro.
pub(crate) enum Step {
    It(ItStep),
    Describe(DescribeStep),
}
