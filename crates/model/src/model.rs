use crate::backoff::Backoff;
use crate::history::SampleHistory;
use crate::signal::Signal;
use crate::units::{convert_to_largest_unit, scale_to};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use sysmon_core::{
    MemoryUnit, MetricSample, MetricsPayload, MetricsSource, MonitorError, ResourceSnapshot,
    ResourceState, Result,
};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Default ceiling for the retry delay after consecutive failures.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Construction options for [`ResourceModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    /// Delay between polls while the endpoint is healthy.
    pub refresh_rate: Duration,
    /// Upper bound for the delay while the endpoint keeps failing.
    pub max_backoff: Duration,
}

impl ModelOptions {
    /// Uses [`DEFAULT_MAX_BACKOFF`], or the refresh rate if that is longer.
    pub fn new(refresh_rate: Duration) -> Self {
        Self {
            refresh_rate,
            max_backoff: DEFAULT_MAX_BACKOFF.max(refresh_rate),
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_rate.is_zero() {
            return Err(MonitorError::Config("refresh rate must be positive".into()));
        }
        if self.max_backoff < self.refresh_rate {
            return Err(MonitorError::Config(format!(
                "max backoff ({} ms) is shorter than the refresh rate ({} ms)",
                self.max_backoff.as_millis(),
                self.refresh_rate.as_millis()
            )));
        }
        Ok(())
    }
}

/// Polls a [`MetricsSource`] and keeps the derived resource usage current.
///
/// The poll driver starts as soon as the model is built and keeps going until
/// [`dispose`](Self::dispose) is called or the model is dropped. Only one
/// request is ever in flight; a failed poll pushes the next one out with
/// exponential backoff, a successful one restores the base interval.
///
/// Observers attached through [`changed`](Self::changed) receive a
/// [`ResourceSnapshot`] after every successful poll, and once when the
/// metrics stop being available.
///
/// After `dispose`, getters keep returning the last state, [`refresh`](Self::refresh)
/// fails with [`MonitorError::Disposed`], and observers are never invoked again.
pub struct ResourceModel {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ResourceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceModel")
            .field("state", &self.state())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

struct Shared {
    source:    Arc<dyn MetricsSource>,
    inner:     Mutex<Inner>,
    changed:   Signal<ResourceSnapshot>,
    /// Held for the whole fetch-and-apply cycle.
    poll_gate: tokio::sync::Mutex<()>,
    closed:    AtomicBool,
    shutdown:  Notify,
}

struct Inner {
    state:   ResourceState,
    history: SampleHistory,
    backoff: Backoff,
}

impl ResourceModel {
    /// Build the model and start polling.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(options: ModelOptions, source: Arc<dyn MetricsSource>) -> Result<Self> {
        options.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MonitorError::Config(format!("no Tokio runtime: {e}")))?;

        let shared = Arc::new(Shared {
            source,
            inner: Mutex::new(Inner {
                state:   ResourceState::default(),
                history: SampleHistory::new(),
                backoff: Backoff::new(options.refresh_rate, options.max_backoff),
            }),
            changed:   Signal::new(),
            poll_gate: tokio::sync::Mutex::new(()),
            closed:    AtomicBool::new(false),
            shutdown:  Notify::new(),
        });

        runtime.spawn(drive(Arc::clone(&shared)));
        info!(
            "Resource model polling every {} ms",
            options.refresh_rate.as_millis()
        );

        Ok(Self { shared })
    }

    /// Poll right now and resolve once that poll has been applied.
    ///
    /// Waits for any poll already in flight first. The regular schedule is
    /// left alone.
    pub async fn refresh(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(MonitorError::Disposed);
        }
        self.shared.poll_once().await;
        Ok(())
    }

    /// Stop polling. Idempotent.
    ///
    /// A request already in flight is allowed to finish, but its result is
    /// discarded. Observers are checked against the closed flag one by one,
    /// so when another thread is emitting at the moment of the call, the
    /// observer it has already started (or is about to start) may still run
    /// once; none runs after that.
    pub fn dispose(&self) {
        {
            // Taken so no mutation can interleave with the flag flip.
            let _inner = self.shared.lock();
            if self.shared.closed.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        self.shared.shutdown.notify_one();
        info!("Resource model disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Observers of state changes.
    pub fn changed(&self) -> &Signal<ResourceSnapshot> {
        &self.shared.changed
    }

    pub fn state(&self) -> ResourceState {
        self.shared.lock().state.clone()
    }

    /// State and history captured together.
    pub fn snapshot(&self) -> ResourceSnapshot {
        self.shared.lock().snapshot()
    }

    /// The last samples, oldest first.
    pub fn history(&self) -> Vec<MetricSample> {
        self.shared.lock().history.to_vec()
    }

    pub fn memory_available(&self) -> bool {
        self.shared.lock().state.memory_available
    }

    pub fn cpu_available(&self) -> bool {
        self.shared.lock().state.cpu_available
    }

    /// `true` if either metric is available.
    pub fn metrics_available(&self) -> bool {
        self.shared.lock().state.metrics_available()
    }

    pub fn current_memory(&self) -> f64 {
        self.shared.lock().state.current_memory
    }

    pub fn memory_limit(&self) -> Option<f64> {
        self.shared.lock().state.memory_limit
    }

    pub fn units(&self) -> MemoryUnit {
        self.shared.lock().state.units
    }

    pub fn current_cpu_percent(&self) -> f64 {
        self.shared.lock().state.current_cpu_percent
    }

    pub fn cpu_limit(&self) -> Option<f64> {
        self.shared.lock().state.cpu_limit
    }

    /// Delay the driver will wait after the most recent poll.
    pub fn current_delay(&self) -> Duration {
        self.shared.lock().backoff.current_delay()
    }
}

impl Drop for ResourceModel {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Self-scheduling poll loop. The first poll fires immediately.
async fn drive(shared: Arc<Shared>) {
    let mut delay = Duration::ZERO;
    loop {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shared.shutdown.notified() => break,
        }
        if shared.is_closed() {
            break;
        }
        delay = shared.poll_once().await;
        debug!("Next metrics poll in {} ms", delay.as_millis());
    }
    debug!("Resource model poll driver stopped");
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// One fetch-evaluate cycle. Returns the delay before the next one.
    async fn poll_once(&self) -> Duration {
        let _gate = self.poll_gate.lock().await;
        if self.is_closed() {
            return self.lock().backoff.current_delay();
        }

        let outcome = self.source.fetch().await;

        let (delay, notify) = match outcome {
            Ok(Some(payload)) => self.apply_payload(&payload),
            Ok(None) => {
                debug!("Metrics endpoint returned no data");
                self.mark_unavailable()
            }
            Err(e) => {
                debug!("Metrics request failed: {e}");
                self.mark_unavailable()
            }
        };

        if let Some(snapshot) = notify {
            self.changed.emit_while(&snapshot, || !self.is_closed());
        }
        delay
    }

    fn apply_payload(&self, payload: &MetricsPayload) -> (Duration, Option<ResourceSnapshot>) {
        let mut inner = self.lock();
        if self.is_closed() {
            return (inner.backoff.current_delay(), None);
        }

        let was_available = inner.state.metrics_available();
        inner.update_from_payload(payload);
        let delay = inner.backoff.mark_success();

        if !was_available && inner.state.metrics_available() {
            info!("Resource metrics available");
        }
        (delay, Some(inner.snapshot()))
    }

    fn mark_unavailable(&self) -> (Duration, Option<ResourceSnapshot>) {
        let mut inner = self.lock();
        if self.is_closed() {
            return (inner.backoff.current_delay(), None);
        }

        let was_available = inner.state.metrics_available();
        inner.state = ResourceState::default();
        let delay = inner.backoff.mark_failure();

        if was_available {
            warn!(
                "Resource metrics unavailable; retrying in {} ms",
                delay.as_millis()
            );
            (delay, Some(inner.snapshot()))
        } else {
            (delay, None)
        }
    }
}

impl Inner {
    fn snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            state:   self.state.clone(),
            history: self.history.to_vec(),
        }
    }

    fn update_from_payload(&mut self, payload: &MetricsPayload) {
        let state = &mut self.state;

        match payload.rss {
            Some(bytes) => {
                let (current, units) = convert_to_largest_unit(bytes);
                state.memory_available = true;
                state.current_memory = current;
                state.units = units;
                state.memory_limit = payload
                    .memory_limit_bytes()
                    .map(|limit| scale_to(limit, units));
            }
            None => {
                state.memory_available = false;
                state.current_memory = 0.0;
                state.units = MemoryUnit::B;
                state.memory_limit = None;
            }
        }

        state.cpu_available = payload.cpu_percent.is_some();
        state.current_cpu_percent = payload.cpu_percent.map_or(0.0, |pct| pct / 100.0);
        state.cpu_limit = payload.cpu_limit();

        let sample = MetricSample {
            memory_percent: state.memory_fraction(),
            cpu_percent:    Some(state.current_cpu_percent),
        };
        self.history.push(sample);
    }
}
