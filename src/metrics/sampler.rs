//! Background task that periodically feeds the history buffer.

use crate::metrics::{data::Sample, store::MetricsStore, traits::MetricsProvider};
use futures_util::stream::{self, BoxStream};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

/// A metrics provider shared between the sampler and request handlers.
pub type SharedProvider<P> = Arc<Mutex<P>>;

/// Periodic collector: one reading per interval, appended to the store.
pub struct Sampler<P> {
    provider: SharedProvider<P>,
    store: Arc<MetricsStore>,
    interval: Duration,
}

impl<P: MetricsProvider> Sampler<P> {
    pub fn new(provider: SharedProvider<P>, store: Arc<MetricsStore>, interval: Duration) -> Self {
        Self {
            provider,
            store,
            interval,
        }
    }

    /// Stream of samples, one per tick.
    ///
    /// The first reading is immediate; after that each tick sleeps the full
    /// interval before collecting, however long the previous collection
    /// took. The stream ends at the first provider failure.
    pub fn sample_stream(&self) -> BoxStream<'static, Sample> {
        let interval = self.interval;
        let stream = stream::unfold(
            (Arc::clone(&self.provider), true),
            move |(provider, first)| async move {
                if !first {
                    time::sleep(interval).await;
                }

                let reading = {
                    let mut provider = provider.lock().await;
                    provider.collect_sample().await
                };

                match reading {
                    Ok(sample) => Some((sample, (provider, false))),
                    Err(err) => {
                        error!("Failed to collect sample, stopping sampler: {}", err);
                        None
                    }
                }
            },
        );

        Box::pin(stream)
    }

    /// Drain the sample stream into the store until it ends.
    pub async fn run(self) {
        info!(
            "Sampler started ({:.3}s interval, {} samples retained)",
            self.interval.as_secs_f64(),
            self.store.history().capacity()
        );

        let mut samples = self.sample_stream();
        let mut ticks: u64 = 0;
        while let Some(sample) = samples.next().await {
            ticks += 1;
            debug!(tick = ticks, cpu = sample.cpu_percent, "Recorded sample");
            self.store.record(sample);
        }

        warn!("Sampler stopped after {} ticks; history is frozen", ticks);
    }

    /// Start the sampler on the tokio runtime.
    pub fn spawn(self) -> SamplerHandle {
        SamplerHandle {
            task: tokio::spawn(self.run()),
        }
    }
}

/// Handle to a running sampler task.
#[derive(Debug)]
pub struct SamplerHandle {
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Whether the sampler has stopped, either by failure or by abort.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the sampler. The history keeps whatever it holds.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the sampler task to end.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            if err.is_panic() {
                error!("Sampler task panicked: {}", err);
            }
        }
    }
}
