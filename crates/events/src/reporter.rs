use crate::{Event, EventSink};
use tokio::sync::{mpsc, oneshot};
use tracing::trace;

#[derive(Debug)]
enum Command {
    Event(Event),
    Shutdown(oneshot::Sender<()>),
}

/// Producer handle of the progress pipeline.
///
/// Clones share the same queue and worker. The worker lives until
/// [`Reporter::shutdown`] is called or every handle is dropped.
#[derive(Clone, Debug)]
pub struct Reporter {
    tx: mpsc::UnboundedSender<Command>,
}

impl Reporter {
    /// Starts the worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<S: EventSink>(sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(sink, rx));
        Self { tx }
    }

    /// Enqueues `event` without waiting for the worker.
    ///
    /// Events submitted after shutdown are dropped.
    pub fn submit(&self, event: Event) {
        if let Err(mpsc::error::SendError(_)) = self.tx.send(Command::Event(event)) {
            trace!(target: "solar::events", "reporter stopped, event dropped");
        }
    }

    /// Drains every event submitted so far, then stops the worker.
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Command::Shutdown(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Whether the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

async fn run_worker<S: EventSink>(mut sink: S, mut rx: mpsc::UnboundedReceiver<Command>) {
    trace!(target: "solar::events", "reporter worker started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Event(event) => sink.render(event),
            Command::Shutdown(ack) => {
                sink.finish();
                let _ = ack.send(());
                trace!(target: "solar::events", "reporter worker stopped");
                return;
            }
        }
    }
    sink.finish();
    trace!(target: "solar::events", "reporter worker stopped, all producers gone");
}
