//! Status poller
//!
//! Fetches one status source on a fixed interval and hands every result to
//! callbacks. A tick is skipped while the previous fetch is outstanding, so
//! a slow backend never accumulates a backlog of requests.
//!
//! Results of one poller are delivered in the order their fetches were
//! issued: the next fetch starts only after the previous result has been
//! handed to its callback.
//!
//! Pollers are single-use: `start` is idempotent, and once `stop` has been
//! called no callback fires again, including for a fetch that was already in
//! flight.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use pipewatch_core::domain::source::SourceKind;
use tokio::sync::watch;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::source::{SourceError, StatusSource};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

type UpdateCallback<T> = Box<dyn Fn(T) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(SourceError) + Send + Sync>;

struct Callbacks<T> {
    on_update: UpdateCallback<T>,
    on_error: ErrorCallback,
}

/// State shared between the poller handle, its timer task and fetch tasks
struct Shared<S: StatusSource> {
    source: S,
    kind: SourceKind,
    /// Set once by `start`; its presence means the poller has been started
    callbacks: OnceLock<Callbacks<S::Snapshot>>,
    in_flight: AtomicBool,
    stopped: AtomicBool,
    fetches: AtomicU64,
}

impl<S: StatusSource> Shared<S> {
    /// Issues a fetch unless stopped, not started, or already fetching
    fn tick(this: &Arc<Self>) -> bool {
        if this.stopped.load(Ordering::Acquire) || this.callbacks.get().is_none() {
            return false;
        }

        if this.in_flight.swap(true, Ordering::AcqRel) {
            debug!("{} fetch still in flight, skipping tick", this.kind);
            return false;
        }

        this.fetches.fetch_add(1, Ordering::Relaxed);

        let shared = Arc::clone(this);
        tokio::spawn(async move {
            shared.fetch_once().await;
        });

        true
    }

    /// Fetches once and delivers the result
    ///
    /// The in-flight flag is held until the callback has returned, so the
    /// next fetch cannot be issued while a result is still undelivered.
    async fn fetch_once(&self) {
        let _in_flight = InFlightGuard(&self.in_flight);
        let result = self.source.fetch().await;

        let Some(callbacks) = self.callbacks.get() else {
            return;
        };

        if self.stopped.load(Ordering::Acquire) {
            debug!("{} poller stopped, discarding fetch result", self.kind);
            return;
        }

        match result {
            Ok(snapshot) => (callbacks.on_update)(snapshot),
            Err(e) => {
                warn!("{} fetch failed: {}", self.kind, e);
                (callbacks.on_error)(e);
            }
        }
    }
}

/// Clears the in-flight flag on drop, including when a callback panics
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Interval poller over one [`StatusSource`]
pub struct Poller<S: StatusSource> {
    shared: Arc<Shared<S>>,
    stop_tx: watch::Sender<bool>,
}

impl<S: StatusSource> Poller<S> {
    /// Creates a poller; nothing is fetched until [`start`](Self::start)
    pub fn new(source: S) -> Self {
        let kind = source.kind();
        let (stop_tx, _) = watch::channel(false);

        Self {
            shared: Arc::new(Shared {
                source,
                kind,
                callbacks: OnceLock::new(),
                in_flight: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                fetches: AtomicU64::new(0),
            }),
            stop_tx,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.shared.kind
    }

    /// Starts polling
    ///
    /// The first tick fires immediately. Calling `start` on a poller that is
    /// already started, or has been stopped, does nothing.
    ///
    /// # Arguments
    /// * `interval` - Time between ticks
    /// * `on_update` - Invoked with every successful fetch
    /// * `on_error` - Invoked with every failed fetch; polling continues
    pub fn start<U, E>(&self, interval: Duration, on_update: U, on_error: E)
    where
        U: Fn(S::Snapshot) + Send + Sync + 'static,
        E: Fn(SourceError) + Send + Sync + 'static,
    {
        if self.is_stopped() {
            debug!("{} poller already stopped, ignoring start", self.kind());
            return;
        }

        let callbacks = Callbacks {
            on_update: Box::new(on_update),
            on_error: Box::new(on_error),
        };
        if self.shared.callbacks.set(callbacks).is_err() {
            debug!("{} poller already started", self.kind());
            return;
        }

        let interval = interval.max(MIN_INTERVAL);
        info!("Starting {} poller (interval: {:?})", self.kind(), interval);

        let shared = Arc::clone(&self.shared);
        let mut stop_rx = self.stop_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        Shared::tick(&shared);
                    }
                    changed = stop_rx.changed() => {
                        let stop_requested = changed.is_err() || *stop_rx.borrow();
                        if stop_requested {
                            break;
                        }
                    }
                }
            }

            debug!("{} poller timer exited", shared.kind);
        });
    }

    /// Forces a tick now
    ///
    /// # Returns
    /// Whether a fetch was issued
    pub fn tick(&self) -> bool {
        Shared::tick(&self.shared)
    }

    /// Stops polling; pending and future results are discarded
    pub fn stop(&self) {
        if !self.shared.stopped.swap(true, Ordering::AcqRel) {
            info!("Stopping {} poller", self.kind());
        }
        self.stop_tx.send_replace(true);
    }

    pub fn is_started(&self) -> bool {
        self.shared.callbacks.get().is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Started and not yet stopped
    pub fn is_active(&self) -> bool {
        self.is_started() && !self.is_stopped()
    }

    pub fn is_in_flight(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Number of fetches issued so far
    pub fn fetch_count(&self) -> u64 {
        self.shared.fetches.load(Ordering::Relaxed)
    }
}

impl<S: StatusSource> Drop for Poller<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
