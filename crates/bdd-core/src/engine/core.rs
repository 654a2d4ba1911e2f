//! Fachada del motor: registro de raíces, configuración y `run`.

use regex::Regex;
use serde_json::{Map, Value};

use crate::batch::{task, Batch};
use crate::context::{OmitPattern, OmitRules, Role, SharedContext};
use crate::errors::FlowError;
use crate::event::{Emitter, EventKind, FlowEvent};
use crate::step::{DescribeStep, DescribeWrap, ItWrap};

use super::describe::{run_describe_step, DescribeConfig, DescribeCtx, Runtime};

/// Callback de término. Recibe el resultado global exactamente una vez por run.
pub type DoneFn = Box<dyn FnMut(Result<(), FlowError>) + Send>;

/// Crea un motor nuevo, sin raíces ni configuración.
pub fn create() -> Flow {
    Flow::new()
}

/// Motor de ejecución de flujos BDD.
///
/// Acumula grupos raíz y configuración, siembra el contexto compartido y
/// ejecuta todas las raíces en secuencia a través del scheduler. Todo el
/// estado es propio de la instancia: varios `Flow` conviven en un proceso
/// sin interferirse.
///
/// Uso típico:
///
/// ```ignore
/// let mut flow = create()
///     .add_context_prop("base", 1)
///     .add_root_describe("subject", |d| {
///         d.it("does x", sync_fn(|ctx| { /* ... */ Ok(()) }));
///     })
///     .done(|result| println!("run finished: {result:?}"));
/// flow.run().await?;
/// ```
pub struct Flow {
    seed_props: Map<String, Value>,
    shared: SharedContext,
    roots: Vec<DescribeStep>,
    omit: OmitRules,
    grep: Option<Regex>,
    grepv: Option<Regex>,
    it_wrap: Option<ItWrap>,
    describe_wrap: Option<DescribeWrap>,
    done: Option<DoneFn>,
    emitter: Emitter,
}

impl Flow {
    pub fn new() -> Self {
        Self { seed_props: Map::new(),
               shared: SharedContext::new(),
               roots: Vec::new(),
               omit: OmitRules::default(),
               grep: None,
               grepv: None,
               it_wrap: None,
               describe_wrap: None,
               done: None,
               emitter: Emitter::default() }
    }

    /// Siembra una propiedad del contexto compartido inicial. Se aplica al
    /// comienzo de cada `run`.
    pub fn add_context_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.seed_props.insert(key.into(), value.into());
        self
    }

    /// Registra un grupo raíz. El cuerpo corre recién durante `run`, con el
    /// receptor de registro como argumento.
    pub fn add_root_describe(mut self,
                             name: impl Into<String>,
                             body: impl FnMut(&mut DescribeCtx<'_>) + Send + 'static)
                             -> Self {
        self.roots.push(DescribeStep { name: name.into(),
                                       body: Box::new(body) });
        self
    }

    /// Oculta claves de contexto para un rol. Una cadena literal se toma como
    /// coincidencia exacta; un `Regex` se usa tal cual.
    pub fn hide_context_prop(mut self, role: Role, pattern: impl Into<OmitPattern>) -> Self {
        self.omit.hide(role, pattern);
        self
    }

    /// Patrón de inclusión: sólo ejecutan los casos cuyo path coincide.
    pub fn grep(mut self, pattern: Regex) -> Self {
        self.grep = Some(pattern);
        self
    }

    /// Patrón de exclusión: los casos cuyo path coincide no ejecutan. Tiene
    /// precedencia sobre `grep`.
    pub fn grepv(mut self, pattern: Regex) -> Self {
        self.grepv = Some(pattern);
        self
    }

    /// Wrapper opcional alrededor de cada caso `it`.
    pub fn it_wrap(mut self, wrap: ItWrap) -> Self {
        self.it_wrap = Some(wrap);
        self
    }

    /// Wrapper opcional alrededor de cada cuerpo `describe`.
    pub fn describe_wrap(mut self, wrap: DescribeWrap) -> Self {
        self.describe_wrap = Some(wrap);
        self
    }

    /// Callback de término del run, con el mismo resultado que `run` retorna.
    pub fn done(mut self, f: impl FnMut(Result<(), FlowError>) + Send + 'static) -> Self {
        self.done = Some(Box::new(f));
        self
    }

    /// Suscribe un handler a una clase de evento de ciclo de vida.
    pub fn on(mut self, kind: EventKind, handler: impl FnMut(&str) + Send + 'static) -> Self {
        self.emitter.on(kind, Box::new(handler));
        self
    }

    /// Contexto compartido autoritativo (estado tras el último run).
    pub fn shared_context(&self) -> &SharedContext {
        &self.shared
    }

    /// Eventos emitidos por el último run, en orden de emisión.
    pub fn events(&self) -> &[FlowEvent] {
        self.emitter.events()
    }

    /// Ejecuta todas las raíces en orden de registro, sin solaparse. El
    /// contexto se resiembra desde las propiedades configuradas y el log de
    /// eventos se vacía al comenzar. Ante el primer error se aborta todo lo
    /// restante y el mismo error llega a `done` y al retorno.
    pub async fn run(&mut self) -> Result<(), FlowError> {
        self.shared = SharedContext::from_map(self.seed_props.clone());
        self.emitter.reset();
        let mut depth = 0usize;

        tracing::debug!(roots = self.roots.len(), "flow run started");

        let result = {
            let Flow { shared,
                       roots,
                       omit,
                       grep,
                       grepv,
                       it_wrap,
                       describe_wrap,
                       emitter,
                       .. } = self;
            let mut rt = Runtime { shared,
                                   emitter,
                                   depth: &mut depth,
                                   it_wrap,
                                   describe_wrap };
            let base = DescribeConfig { path: Vec::new(),
                                        grep: grep.clone(),
                                        grepv: grepv.clone(),
                                        omit: omit.clone() };

            let mut batch = Batch::new();
            for root in roots.iter_mut() {
                let cfg = base.clone();
                batch.push(task(move |rt: &mut Runtime<'_>| {
                    run_describe_step(root, cfg, Role::RootDescribe, rt)
                }));
            }
            batch.run(&mut rt).await
        };

        match &result {
            Ok(()) => tracing::debug!("flow run finished"),
            Err(error) => tracing::warn!(%error, "flow run aborted"),
        }
        if let Some(done) = self.done.as_mut() {
            done(result.clone());
        }
        result
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}
