//! Ejecutor secuencial de lotes de tareas.
//!
//! Rol en el flujo:
//! - Cada nivel del árbol arma un `Batch` con sus tareas (hooks, casos,
//!   sub-árboles) y lo ejecuta en orden de registro.
//! - La concurrencia está fija en 1 por construcción: cada tarea recibe el
//!   préstamo exclusivo del estado `S` y la tarea `i + 1` sólo comienza
//!   cuando el futuro de la tarea `i` resolvió.
//! - Ante el primer `Err` se abortan las tareas restantes (stop-on-failure)
//!   y el error se propaga al llamador.
//!
//! Una tarea cuyo futuro nunca resuelve detiene el lote indefinidamente; eso
//! es una violación de contrato del llamador, no un error del ejecutor.

use futures::future::BoxFuture;

use crate::errors::StepResult;

/// Tarea de un `Batch`: cierre de un solo uso que recibe acceso exclusivo al
/// estado compartido `S` y devuelve un futuro ligado a ese préstamo.
pub type BatchTask<'e, S> =
    Box<dyn for<'s> FnOnce(&'s mut S) -> BoxFuture<'s, StepResult> + Send + 'e>;

/// Fija el bound de tipado del cierre al convertirlo en tarea. Empujar
/// `task(|s| ...)` evita anotar el trait object completo en cada uso.
pub fn task<'e, S, F>(f: F) -> BatchTask<'e, S>
    where F: for<'s> FnOnce(&'s mut S) -> BoxFuture<'s, StepResult> + Send + 'e
{
    Box::new(f)
}

/// Lote ordenado de tareas sobre un estado `S`.
pub struct Batch<'e, S> {
    tasks: Vec<BatchTask<'e, S>>,
}

impl<'e, S> Batch<'e, S> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Agrega una tarea al final del lote. El orden de inserción es el orden
    /// de ejecución.
    pub fn push(&mut self, task: BatchTask<'e, S>) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ejecuta las tareas en secuencia estricta. Un lote vacío completa de
    /// inmediato con `Ok`.
    pub async fn run(self, state: &mut S) -> StepResult {
        for task in self.tasks {
            task(state).await?;
        }
        Ok(())
    }
}

impl<S> Default for Batch<'_, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FlowError;

    #[tokio::test]
    async fn empty_batch_completes_immediately() {
        let batch: Batch<Vec<&'static str>> = Batch::new();
        let mut log = Vec::new();
        assert!(batch.run(&mut log).await.is_ok());
        assert!(log.is_empty(), "no task should have run");
    }

    #[tokio::test]
    async fn tasks_run_in_push_order() {
        let mut batch = Batch::new();
        for tag in ["a", "b", "c"] {
            batch.push(task(move |log: &mut Vec<&'static str>| {
                Box::pin(async move {
                    log.push(tag);
                    Ok(())
                })
            }));
        }
        let mut log = Vec::new();
        batch.run(&mut log).await.expect("all tasks succeed");
        assert_eq!(log, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn first_error_aborts_remaining_tasks() {
        let mut batch = Batch::new();
        batch.push(task(|log: &mut Vec<&'static str>| {
            Box::pin(async move {
                log.push("ran");
                Ok(())
            })
        }));
        batch.push(task(|_log: &mut Vec<&'static str>| {
            Box::pin(async move { Err(FlowError::step("boom")) })
        }));
        batch.push(task(|log: &mut Vec<&'static str>| {
            Box::pin(async move {
                log.push("never");
                Ok(())
            })
        }));

        let mut log = Vec::new();
        let err = batch.run(&mut log).await.expect_err("second task fails");
        assert_eq!(err, FlowError::step("boom"));
        assert_eq!(log, vec!["ran"], "tasks after the failure must not run");
    }
}
