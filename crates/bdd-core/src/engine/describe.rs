//! Nodo `describe` y su pasada de ejecución.
//!
//! La pasada de un nodo es una máquina secuencial: correr el cuerpo de
//! registro, entrar (profundidad +1, evento `DescribePush`), `before`, los
//! pasos hijos en orden de registro, `after`, salir (profundidad -1, evento
//! `DescribePop`). Los hijos hoja quedan envueltos en su propio lote
//! `beforeEach` → cuerpo → `afterEach`; los hijos grupo recursan en esta
//! misma pasada con una copia de la configuración propagada.

use futures::future::BoxFuture;
use regex::Regex;
use serde_json::{Map, Value};

use crate::batch::{task, Batch};
use crate::context::{filter_props, OmitRules, Role, SharedContext, StepContext};
use crate::errors::{FlowError, StepResult};
use crate::event::{Emitter, EventKind};
use crate::step::{DescribeStep, DescribeWrap, HookKind, HookSet, ItStep, ItWrap, Step, StepFn};

use super::select::{case_selected, joined_path};

/// Configuración propagada de un `describe` padre a cada hijo. Se copia por
/// valor cuando el hijo comienza su pasada: lo que un hermano haga con su
/// copia (p. ej. extender su path) nunca se filtra a los demás.
#[derive(Debug, Clone)]
pub(crate) struct DescribeConfig {
    pub path: Vec<String>,
    pub grep: Option<Regex>,
    pub grepv: Option<Regex>,
    pub omit: OmitRules,
}

/// Estado mutable compartido de un run en curso. Viaja por préstamo
/// exclusivo: el paso que está ejecutando es el único dueño del batón.
pub(crate) struct Runtime<'f> {
    pub shared: &'f mut SharedContext,
    pub emitter: &'f mut Emitter,
    pub depth: &'f mut usize,
    pub it_wrap: &'f mut Option<ItWrap>,
    pub describe_wrap: &'f mut Option<DescribeWrap>,
}

/// Un nivel del árbol en ejecución: pasos hijos, hooks propios y la copia de
/// configuración recibida del padre.
pub(crate) struct DescribeNode {
    name: String,
    steps: Vec<Step>,
    hooks: HookSet,
    cfg: DescribeConfig,
}

/// Receptor del cuerpo de un `describe`: registra los pasos y hooks del
/// nivel y expone la vista de contexto filtrada por el rol del grupo.
pub struct DescribeCtx<'a> {
    node: &'a mut DescribeNode,
    props: &'a mut Map<String, Value>,
    depth: usize,
}

impl DescribeCtx<'_> {
    /// Registra un caso hoja. No ejecuta nada en este momento.
    pub fn it(&mut self, name: impl Into<String>, body: StepFn) {
        self.node.steps.push(Step::It(ItStep { name: name.into(), body }));
    }

    /// Registra un grupo anidado. Su cuerpo corre recién cuando el grupo
    /// comienza su propia pasada.
    pub fn describe(&mut self,
                    name: impl Into<String>,
                    body: impl FnMut(&mut DescribeCtx<'_>) + Send + 'static) {
        self.node.steps.push(Step::Describe(DescribeStep { name: name.into(),
                                                           body: Box::new(body) }));
    }

    /// Hook que corre antes del primer paso de este nivel.
    pub fn before(&mut self, f: StepFn) {
        self.node.hooks.set(HookKind::Before, f);
    }

    /// Hook que corre antes de cada caso hoja directo de este nivel.
    pub fn before_each(&mut self, f: StepFn) {
        self.node.hooks.set(HookKind::BeforeEach, f);
    }

    /// Hook que corre después del último paso de este nivel.
    pub fn after(&mut self, f: StepFn) {
        self.node.hooks.set(HookKind::After, f);
    }

    /// Hook que corre después de cada caso hoja directo de este nivel.
    pub fn after_each(&mut self, f: StepFn) {
        self.node.hooks.set(HookKind::AfterEach, f);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    /// Nombre del grupo cuyo cuerpo está corriendo.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Profundidad del padre (la propia entra en vigor al terminar el
    /// cuerpo de registro).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Alcance que comparten las tareas hijas de un nodo mientras su lote corre.
pub(crate) struct ChildScope<'n, 'f> {
    describe: &'n str,
    hooks: &'n mut HookSet,
    cfg: &'n DescribeConfig,
    rt: &'n mut Runtime<'f>,
}

impl ChildScope<'_, '_> {
    /// Protocolo único de hooks: vista filtrada por rol `hook`, invocación
    /// (esperando el futuro si es async) y fusión de vuelta al completar.
    async fn run_hook(&mut self, kind: HookKind) -> StepResult {
        let hook = self.hooks.slot_mut(kind);
        let view = self.rt.shared.filtered(Role::Hook, &self.cfg.omit);
        let mut ctx = StepContext::for_hook(view, *self.rt.depth);

        match hook.call(&mut ctx).await {
            Ok(()) => {
                self.rt
                    .shared
                    .extend_filtered(ctx.into_props(), Role::Hook, &self.cfg.omit);
                Ok(())
            }
            Err(FlowError::Step(message)) => {
                Err(FlowError::HookFailed { hook: kind.label().to_string(),
                                            describe: self.describe.to_string(),
                                            message })
            }
            Err(other) => Err(other),
        }
    }
}

/// Ejecuta un paso `describe` completo: construye el nodo, corre su cuerpo
/// de registro y luego su pasada. Boxeado porque la recursión pasa por acá.
pub(crate) fn run_describe_step<'a, 'f: 'a>(step: &'a mut DescribeStep,
                                            cfg: DescribeConfig,
                                            role: Role,
                                            rt: &'a mut Runtime<'f>)
                                            -> BoxFuture<'a, StepResult> {
    Box::pin(async move {
        let mut child_cfg = cfg;
        child_cfg.path.push(step.name.clone());

        let mut node = DescribeNode { name: step.name.clone(),
                                      steps: Vec::new(),
                                      hooks: HookSet::default(),
                                      cfg: child_cfg };

        // Cuerpo de registro: vista filtrada por rol + props del wrapper.
        let mut view = rt.shared.filtered(role, &node.cfg.omit);
        if let Some(wrap) = rt.describe_wrap.as_mut() {
            let ext = filter_props(wrap(&node.name), role, &node.cfg.omit);
            for (key, value) in ext {
                view.insert(key, value);
            }
        }
        {
            let mut ctx = DescribeCtx { node: &mut node,
                                        props: &mut view,
                                        depth: *rt.depth };
            (step.body)(&mut ctx);
        }
        rt.shared.extend_filtered(view, role, &node.cfg.omit);

        *rt.depth += 1;
        rt.emitter.emit(EventKind::DescribePush, &node.name);
        tracing::debug!(name = %node.name, depth = *rt.depth, "describe entered");

        let result = run_node(&mut node, rt).await;

        *rt.depth -= 1;
        rt.emitter.emit(EventKind::DescribePop, &node.name);
        tracing::debug!(name = %node.name, depth = *rt.depth, "describe exited");

        result
    })
}

/// Pasada de un nodo ya registrado: `before`, pasos hijos, `after`, como un
/// único lote secuencial sobre el alcance del nodo.
async fn run_node(node: &mut DescribeNode, rt: &mut Runtime<'_>) -> StepResult {
    let DescribeNode { name, steps, hooks, cfg } = node;

    let mut batch = Batch::new();
    batch.push(task(|s: &mut ChildScope<'_, '_>| Box::pin(s.run_hook(HookKind::Before))));
    for step in steps.iter_mut() {
        match step {
            Step::Describe(child) => {
                batch.push(task(move |s: &mut ChildScope<'_, '_>| {
                    let cfg = s.cfg.clone();
                    run_describe_step(child, cfg, Role::Describe, &mut *s.rt)
                }));
            }
            Step::It(case) => {
                batch.push(task(move |s: &mut ChildScope<'_, '_>| {
                    Box::pin(run_case(case, s))
                }));
            }
        }
    }
    batch.push(task(|s: &mut ChildScope<'_, '_>| Box::pin(s.run_hook(HookKind::After))));

    let mut scope = ChildScope { describe: name.as_str(),
                                 hooks,
                                 cfg: &*cfg,
                                 rt };
    batch.run(&mut scope).await
}

/// Ejecuta un caso hoja con sus hooks de par. Un caso descartado por la
/// selección conserva su posición pero se convierte en no-op puro: sin
/// `beforeEach`/`afterEach` y sin eventos propios.
async fn run_case<'a>(case: &'a mut ItStep, s: &mut ChildScope<'a, '_>) -> StepResult {
    let joined = joined_path(&s.cfg.path, &case.name);
    if !case_selected(&joined, s.cfg.grep.as_ref(), s.cfg.grepv.as_ref()) {
        tracing::debug!(path = %joined, "case skipped by selection");
        return Ok(());
    }

    let mut batch = Batch::new();
    batch.push(task(|s: &mut ChildScope<'_, '_>| {
        Box::pin(s.run_hook(HookKind::BeforeEach))
    }));
    batch.push(task(move |s: &mut ChildScope<'_, '_>| Box::pin(run_case_body(case, s))));
    batch.push(task(|s: &mut ChildScope<'_, '_>| {
        Box::pin(s.run_hook(HookKind::AfterEach))
    }));
    batch.run(s).await
}

/// Cuerpo del caso: vista filtrada por rol `it` con los metadatos del caso,
/// wrapper opcional, eventos `ItPush`/`ItPop` y fusión al completar.
async fn run_case_body(case: &mut ItStep, s: &mut ChildScope<'_, '_>) -> StepResult {
    let ItStep { name, body } = case;

    let mut case_path = s.cfg.path.clone();
    case_path.push(name.clone());

    let view = s.rt.shared.filtered(Role::It, &s.cfg.omit);
    let mut ctx = StepContext::for_case(view, name.clone(), case_path, *s.rt.depth);

    let (result, wrap_back) = match s.rt.it_wrap.take() {
        None => {
            s.rt.emitter.emit(EventKind::ItPush, name.as_str());
            let result = body.call(&mut ctx).await;
            (result, None)
        }
        Some(ItWrap::Inject(mut wrap)) => {
            ctx.merge_ext(wrap(name.as_str()));
            s.rt.emitter.emit(EventKind::ItPush, name.as_str());
            let result = body.call(&mut ctx).await;
            (result, Some(ItWrap::Inject(wrap)))
        }
        Some(ItWrap::Drive(mut wrap)) => {
            let emitter = &mut *s.rt.emitter;
            let ctx_ref = &mut ctx;
            let case_name: &str = name.as_str();
            let case_fut: BoxFuture<'_, StepResult> = Box::pin(async move {
                emitter.emit(EventKind::ItPush, case_name);
                body.call(ctx_ref).await
            });
            let result = wrap(case_name, case_fut).await;
            (result, Some(ItWrap::Drive(wrap)))
        }
    };
    *s.rt.it_wrap = wrap_back;

    match result {
        Ok(()) => {
            s.rt
             .shared
             .extend_filtered(ctx.into_props(), Role::It, &s.cfg.omit);
            s.rt.emitter.emit(EventKind::ItPop, name.as_str());
            Ok(())
        }
        Err(FlowError::Step(message)) => {
            tracing::warn!(case = %name, %message, "case failed");
            Err(FlowError::CaseFailed { name: name.clone(), message })
        }
        Err(other) => Err(other),
    }
}
