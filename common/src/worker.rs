// One-shot background execution with a write-once outcome
//
// A `Worker` runs a fallible computation off the calling task and captures
// whatever happens to it. Errors and panics never cross `join`: they are
// logged, the error text is retained, and the outcome reads as absent.
use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{error, warn};

pub struct Worker<T> {
    handle: Option<JoinHandle<std::result::Result<T, String>>>,
    // None until joined; then Some(Some(value)) or Some(None) forever
    outcome: Option<Option<T>>,
    error: Option<String>,
}

impl<T: Send + 'static> Worker<T> {
    /// Starts `future` on a new tokio task.
    pub fn spawn<F, E>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let handle = tokio::spawn(async move { future.await.map_err(|e| e.to_string()) });
        Self {
            handle: Some(handle),
            outcome: None,
            error: None,
        }
    }

    /// Starts `func` on the blocking thread pool.
    pub fn spawn_blocking<F, E>(func: F) -> Self
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        E: Display + Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(move || func().map_err(|e| e.to_string()));
        Self {
            handle: Some(handle),
            outcome: None,
            error: None,
        }
    }

    /// Waits for the background execution to finish and returns the outcome.
    /// The first call resolves the outcome cell; later calls return the same
    /// cached outcome without blocking.
    pub async fn join(&mut self) -> Option<&T> {
        if self.outcome.is_none() {
            let handle = self.handle.take()?;
            let resolved = match handle.await {
                Ok(Ok(value)) => Some(value),
                Ok(Err(e)) => {
                    warn!("background work failed: {e}");
                    self.error = Some(e);
                    None
                }
                Err(join_error) => {
                    if join_error.is_panic() {
                        error!("background work panicked: {join_error}");
                    } else {
                        error!("background work was cancelled: {join_error}");
                    }
                    self.error = Some(join_error.to_string());
                    None
                }
            };
            self.outcome = Some(resolved);
        }
        self.outcome.as_ref().and_then(Option::as_ref)
    }

    /// Outcome of a completed worker; `None` before `join` or on failure.
    pub fn outcome(&self) -> Option<&T> {
        self.outcome.as_ref().and_then(Option::as_ref)
    }

    /// Description of the captured failure, if the work failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
