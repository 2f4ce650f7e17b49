//! Named timers owned by one widget instance.
//!
//! At most one pending task per name: starting a name aborts whatever was
//! registered under it before.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const LEFT_TIME: &str = "leftTime";
pub const CONTRACTS_TIMER: &str = "contractsTimer";
pub const SET_PAYOUT: &str = "setPayout";

#[derive(Clone, Debug, Default)]
pub struct Timers {
    handles: Arc<DashMap<&'static str, JoinHandle<()>>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` under `name`, aborting the previous task of that name.
    pub fn start<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.handles.entry(name) {
            Entry::Occupied(mut e) => {
                e.get().abort();
                e.insert(tokio::spawn(task));
            }
            Entry::Vacant(e) => {
                e.insert(tokio::spawn(task));
            }
        }
        debug!(timer = name, "timer started");
    }

    /// Run `callback` once `delay` has elapsed. Restarting or cancelling the
    /// name only cancels the wait; a callback that already fired runs to
    /// completion.
    pub fn start_timeout<F>(&self, name: &'static str, delay: Duration, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.start(name, async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(callback);
        });
    }

    pub fn cancel(&self, name: &str) {
        if let Some((_, h)) = self.handles.remove(name) {
            h.abort();
            debug!(timer = name, "timer cancelled");
        }
    }

    pub fn cancel_all(&self) {
        for e in self.handles.iter() {
            e.value().abort();
        }
        self.handles.clear();
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.handles
            .get(name)
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Number of names with an unfinished task.
    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|e| !e.value().is_finished()).count()
    }
}
