//! Binario de validación del motor BddFlow.
//!
//! Corre tres demos de punta a punta sobre la API pública: orden de
//! ejecución con eventos, selección por path y propagación de errores.

use bdd_core::{create, sync_fn, EventKind, FlowError, StepContext, StepResult};
use regex::Regex;
use tracing_subscriber::EnvFilter;

fn log(ctx: &mut StepContext, loc: &str) -> StepResult {
    let mut entries = ctx.get("log")
                         .cloned()
                         .unwrap_or_else(|| serde_json::json!([]));
    entries.as_array_mut()
           .expect("log is an array")
           .push(serde_json::json!(loc));
    ctx.set("log", entries);
    Ok(())
}

/// Demo 1: árbol con hooks y anidamiento, eventos impresos en vivo.
async fn run_order_demo() -> Result<(), FlowError> {
    println!("\n=== Demo 1: orden de ejecución y eventos ===");

    let mut flow = create().on(EventKind::DescribePush, |name| println!("  >> describe '{name}'"))
                           .on(EventKind::DescribePop, |name| println!("  << describe '{name}'"))
                           .on(EventKind::ItPush, |name| println!("  -- it '{name}'"))
                           .add_root_describe("calculadora", |d| {
                               d.before(sync_fn(|ctx| log(ctx, "before")));
                               d.after(sync_fn(|ctx| log(ctx, "after")));
                               d.before_each(sync_fn(|ctx| log(ctx, "beforeEach")));
                               d.it("suma", sync_fn(|ctx| log(ctx, "suma")));
                               d.describe("división", |d| {
                                   d.it("por cero", sync_fn(|ctx| log(ctx, "por cero")));
                               });
                           });
    flow.run().await?;

    println!("  log compartido: {}",
             serde_json::to_string(flow.shared_context().get("log").expect("log seeded"))
                 .expect("log serializes"));
    Ok(())
}

/// Demo 2: sólo ejecutan los casos cuyo path coincide con el grep.
async fn run_selection_demo() -> Result<(), FlowError> {
    println!("\n=== Demo 2: selección por path (grep) ===");

    let mut flow = create().grep(Regex::new("smoke").expect("valid demo pattern"))
                           .on(EventKind::ItPush, |name| println!("  -- it '{name}'"))
                           .add_root_describe("suite", |d| {
                               d.it("smoke api", sync_fn(|_| Ok(())));
                               d.it("smoke db", sync_fn(|_| Ok(())));
                               d.it("full regression", sync_fn(|_| Ok(())));
                           });
    flow.run().await?;

    println!("  eventos emitidos: {}", flow.events().len());
    Ok(())
}

/// Demo 3: un caso que falla aborta lo restante y el error llega a `done`.
async fn run_error_demo() {
    println!("\n=== Demo 3: stop-on-failure ===");

    let mut flow = create().add_root_describe("suite frágil", |d| {
                               d.it("rompe", sync_fn(|_| Err(FlowError::step("falla intencional"))));
                               d.it("nunca corre", sync_fn(|_| Ok(())));
                           })
                           .done(|result| match result {
                               Ok(()) => println!("  done: sin errores"),
                               Err(error) => println!("  done: {error}"),
                           });

    match flow.run().await {
        Ok(()) => println!("  inesperado: el run completó"),
        Err(error) => println!("  run abortado como se esperaba: {error}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), FlowError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .init();

    run_order_demo().await?;
    run_selection_demo().await?;
    run_error_demo().await;

    println!("\nDemos completadas.");
    Ok(())
}
