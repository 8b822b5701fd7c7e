use crate::store::TaskStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub type SharedStore = Arc<Mutex<TaskStore>>;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub fn shared(store: TaskStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Background loop that runs [`TaskStore::check_proximity`] once right away
/// and then on every tick until stopped. Dropping the handle aborts the loop.
pub struct ProximityPoller {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProximityPoller {
    pub fn spawn(store: SharedStore, period: Duration) -> Self {
        Self::start(store, period, None)
    }

    /// Like [`ProximityPoller::spawn`], also sending the ids reached by each
    /// check that changed something.
    pub fn spawn_with_listener(
        store: SharedStore,
        period: Duration,
        listener: mpsc::UnboundedSender<Vec<String>>,
    ) -> Self {
        Self::start(store, period, Some(listener))
    }

    fn start(
        store: SharedStore,
        period: Duration,
        listener: Option<mpsc::UnboundedSender<Vec<String>>>,
    ) -> Self {
        let (shutdown, mut stopped) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(period_ms = period.as_millis() as u64, "proximity poller started");

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let reached = match store.lock().await.check_proximity() {
                            Ok(reached) => reached,
                            Err(err) => {
                                warn!(error = %err, "proximity check failed");
                                continue;
                            }
                        };
                        if reached.is_empty() {
                            continue;
                        }
                        if let Some(listener) = listener.as_ref() {
                            // A closed listener only means nobody is watching any more.
                            let _ = listener.send(reached);
                        }
                    }
                }
            }

            debug!("proximity poller stopped");
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take()
            && let Err(err) = handle.await
        {
            warn!(error = %err, "proximity poller ended abnormally");
        }
    }
}

impl Drop for ProximityPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
