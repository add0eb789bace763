// lib/src/polling.rs

// Keyed background refresh shared by every view that watches the same data.
// One task per key, reference counted by live subscriptions; dropping the last
// subscription stops the task.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, info, warn};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

use rest_api::ErrorKind;

use crate::errors::{PortalError, PortalResult};

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, PortalResult<T>> + Send + Sync>;

/// Latest known result for one key.
#[derive(Debug, Clone)]
pub struct PollState<T> {
    /// Last successful value; kept when a later fetch fails.
    pub value: Option<T>,
    pub last_error: Option<String>,
    pub last_error_kind: Option<ErrorKind>,
    pub fetches: u64,
}

impl<T> Default for PollState<T> {
    fn default() -> Self {
        PollState { value: None, last_error: None, last_error_kind: None, fetches: 0 }
    }
}

impl<T> PollState<T> {
    pub fn is_loading(&self) -> bool {
        self.fetches == 0
    }
}

struct Poller<T> {
    state: watch::Receiver<PollState<T>>,
    refresh: Arc<Notify>,
    handle: JoinHandle<()>,
    interval: Duration,
    subscribers: usize,
}

type Registry<T> = Arc<Mutex<HashMap<String, Poller<T>>>>;

fn lock<T>(registry: &Mutex<HashMap<String, Poller<T>>>) -> MutexGuard<'_, HashMap<String, Poller<T>>> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub struct PollingHub<T> {
    pollers: Registry<T>,
}

impl<T> Clone for PollingHub<T> {
    fn clone(&self) -> Self {
        PollingHub { pollers: Arc::clone(&self.pollers) }
    }
}

impl<T> Default for PollingHub<T> {
    fn default() -> Self {
        PollingHub { pollers: Arc::new(Mutex::new(HashMap::new())) }
    }
}

impl<T> PollingHub<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the poller for `key`, starting it if nobody watches that key yet.
    /// The first subscriber's `interval` and `fetch` win; later subscribers share
    /// the running poller and their own are ignored. Must be called inside a
    /// tokio runtime.
    pub fn subscribe<F, Fut>(&self, key: impl Into<String>, interval: Duration, fetch: F) -> Subscription<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PortalResult<T>> + Send + 'static,
    {
        let key = key.into();
        let mut pollers = lock(&self.pollers);
        if let Some(poller) = pollers.get_mut(&key) {
            poller.subscribers += 1;
            if poller.interval != interval {
                debug!(
                    "Poller '{}' keeps its {:?} interval, ignoring requested {:?}",
                    key, poller.interval, interval
                );
            }
            debug!("Joined poller '{}' ({} subscribers)", key, poller.subscribers);
            return Subscription {
                key,
                state: poller.state.clone(),
                refresh: Arc::clone(&poller.refresh),
                pollers: Arc::clone(&self.pollers),
            };
        }

        let fetcher: Fetcher<T> = Arc::new(move || fetch().boxed());
        let (tx, rx) = watch::channel(PollState::default());
        let refresh = Arc::new(Notify::new());
        let handle = tokio::spawn(run_poller(key.clone(), interval, fetcher, tx, Arc::clone(&refresh)));
        info!("Started poller '{}' every {:?}", key, interval);
        pollers.insert(
            key.clone(),
            Poller { state: rx.clone(), refresh: Arc::clone(&refresh), handle, interval, subscribers: 1 },
        );
        Subscription { key, state: rx, refresh, pollers: Arc::clone(&self.pollers) }
    }

    /// Interval of the running poller for `key`.
    pub fn interval(&self, key: &str) -> Option<Duration> {
        lock(&self.pollers).get(key).map(|p| p.interval)
    }

    pub fn subscriber_count(&self, key: &str) -> usize {
        lock(&self.pollers).get(key).map_or(0, |p| p.subscribers)
    }

    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.pollers).keys().cloned().collect();
        keys.sort();
        keys
    }
}

async fn run_poller<T>(
    key: String,
    interval: Duration,
    fetch: Fetcher<T>,
    tx: watch::Sender<PollState<T>>,
    refresh: Arc<Notify>,
) where
    T: Clone + Send + Sync + 'static,
{
    loop {
        // The next fetch is only scheduled once this one finished, so requests
        // for one key never overlap.
        let result = fetch().await;
        match result {
            Ok(value) => tx.send_modify(|state| {
                state.value = Some(value);
                state.last_error = None;
                state.last_error_kind = None;
                state.fetches += 1;
            }),
            Err(err) => {
                log_quietly(&key, &err);
                tx.send_modify(|state| {
                    state.last_error = Some(err.user_message());
                    state.last_error_kind = Some(err.kind());
                    state.fetches += 1;
                });
            }
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = refresh.notified() => debug!("Manual refresh of '{}'", key),
        }
    }
}

fn log_quietly(key: &str, err: &PortalError) {
    if err.kind() == ErrorKind::Network {
        debug!("Poll '{}' failed: {}", key, err);
    } else {
        warn!("Poll '{}' failed: {}", key, err);
    }
}

/// Handle on a shared poller. Dropping it releases the caller's share.
pub struct Subscription<T> {
    key: String,
    state: watch::Receiver<PollState<T>>,
    refresh: Arc<Notify>,
    pollers: Registry<T>,
}

impl<T: Clone> Subscription<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn latest(&self) -> Option<T> {
        self.state.borrow().value.clone()
    }

    pub fn state(&self) -> PollState<T> {
        self.state.borrow().clone()
    }

    /// Waits for the next fetch to land. `false` once the poller is gone.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Fetches now instead of waiting out the interval.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut pollers = lock(&self.pollers);
        let remaining = match pollers.get_mut(&self.key) {
            Some(poller) => {
                poller.subscribers = poller.subscribers.saturating_sub(1);
                poller.subscribers
            }
            None => return,
        };
        if remaining == 0 {
            if let Some(poller) = pollers.remove(&self.key) {
                poller.handle.abort();
                info!("Stopped poller '{}'", self.key);
            }
        }
    }
}
