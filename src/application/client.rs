use crate::application::scenario::{FetchCommand, FetchCompletion};
use crate::domain::ports::PredictionService;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};

type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Runs fetch commands on the Tokio runtime and hands the completions back
/// to the thread that owns the scenario state.
///
/// Completions are delivered in arrival order; deciding whether one is stale
/// is the controller's job.
pub struct ForecastClient {
    runtime: Handle,
    service: Arc<dyn PredictionService>,
    completion_tx: Sender<FetchCompletion>,
    completion_rx: Receiver<FetchCompletion>,
    notifier: Option<Notifier>,
}

impl ForecastClient {
    pub fn new(runtime: Handle, service: Arc<dyn PredictionService>) -> Self {
        let (completion_tx, completion_rx) = crossbeam_channel::unbounded();
        Self {
            runtime,
            service,
            completion_tx,
            completion_rx,
            notifier: None,
        }
    }

    /// Called after every completion is queued (e.g. to wake the UI).
    pub fn with_notifier(mut self, notifier: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn dispatch(&self, command: FetchCommand) {
        info!(
            "Dispatching forecast #{} for {} (vol x{})",
            command.token, command.ticker, command.vol_multiplier
        );
        let service = self.service.clone();
        let tx = self.completion_tx.clone();
        let notifier = self.notifier.clone();

        self.runtime.spawn(async move {
            let outcome = service
                .fetch_prediction(&command.ticker, command.vol_multiplier)
                .await;
            if tx.send(FetchCompletion::new(command.token, outcome)).is_err() {
                debug!("Forecast #{} finished after the client was dropped", command.token);
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
    }

    /// Non-blocking; `None` when nothing has completed yet.
    pub fn poll_next(&self) -> Option<FetchCompletion> {
        self.completion_rx.try_recv().ok()
    }

    /// Blocks the calling thread until a completion arrives or `timeout` passes.
    pub fn wait_next(&self, timeout: Duration) -> Option<FetchCompletion> {
        self.completion_rx.recv_timeout(timeout).ok()
    }
}
