// Background task handle with explicit stop
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns a spawned background loop. `stop` signals the loop and waits for it to exit;
/// dropping the handle aborts it.
pub struct TaskHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn spawn<F, Fut>(name: &'static str, body: F) -> Self
    where
        F: FnOnce(ShutdownSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(body(ShutdownSignal { rx }));
        tracing::debug!(task = name, "background task started");

        Self {
            name,
            shutdown,
            task: Some(task),
        }
    }

    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!(task = self.name, "background task panicked");
                }
            }
        }
        tracing::debug!(task = self.name, "background task stopped");
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Receiving side of a `TaskHandle` stop request.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once stop was requested or the handle is gone.
    pub async fn requested(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}
