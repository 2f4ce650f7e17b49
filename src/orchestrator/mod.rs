//! The selection chain: authorize -> symbols -> symbol -> contracts ->
//! category -> period -> payout -> prices.
//!
//! Every public step handles its own failure by raising a notification, so
//! callers (user actions, timers) never see an error. The `try_*` halves
//! return `Result` and are composed with `?`.

mod contracts;
mod payout;
mod period;
mod symbols;

pub use period::in_final_minutes;

use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::info;

use crate::config::Config;
use crate::notify::Notifier;
use crate::ports::{Analytics, Clock, KeyValueStore, LoginTokenProvider, SystemClock, TradingApi, Ui};
use crate::state::Shared;
use crate::timers::Timers;

// Durable-store keys.
pub const KEY_SYMBOL: &str = "symbol";
pub const KEY_DISPLAY_NAME: &str = "display_name";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_PERIOD: &str = "period";
pub const KEY_PAYOUT: &str = "payout";
pub const KEY_CLIENT_TOKENS: &str = "client.tokens";

/// One trading widget: its state, timers and collaborators.
///
/// Cheap to clone; clones share everything. Timer tasks hold a clone.
#[derive(Clone)]
pub struct Widget {
    pub(crate) cfg: Config,
    pub(crate) shared: Shared,
    pub(crate) notifier: Notifier,
    pub(crate) timers: Timers,

    pub(crate) api: Arc<dyn TradingApi>,
    pub(crate) ui: Arc<dyn Ui>,
    pub(crate) storage: Arc<dyn KeyValueStore>,
    pub(crate) login: Option<Arc<dyn LoginTokenProvider>>,
    pub(crate) analytics: Option<Arc<dyn Analytics>>,
    pub(crate) clock: Arc<dyn Clock>,

    // Completion signal shared by every payout change waiting on the same
    // debounced price request. Taken when the request fires.
    pub(crate) payout_pending: Arc<Mutex<Option<watch::Sender<bool>>>>,
}

impl Widget {
    pub fn new(
        cfg: Config,
        api: Arc<dyn TradingApi>,
        ui: Arc<dyn Ui>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let shared = Shared::new();
        Self {
            cfg,
            notifier: Notifier::new(shared.clone()),
            shared,
            timers: Timers::new(),
            api,
            ui,
            storage,
            login: None,
            analytics: None,
            clock: Arc::new(SystemClock),
            payout_pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Without a provider, authorization is skipped.
    pub fn with_login_provider(mut self, login: Arc<dyn LoginTokenProvider>) -> Self {
        self.login = Some(login);
        self
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn Analytics>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub(crate) fn persisted(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|v| !v.is_empty())
    }

    /// Stop every timer, close every stream and disconnect.
    pub async fn close(&self) {
        self.timers.cancel_all();
        // waiters on a debounce that will never fire are released
        self.payout_pending.lock().await.take();

        let handles = self.shared.teardown().await;
        let n = handles.len();
        for h in handles {
            h.close();
        }
        self.api.disconnect().await;
        info!(streams = n, "widget closed");
    }
}
