use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use binary_widget::paper::{MemoryStore, PaperApi, PaperCall, PaperCatalog, StaticToken};
use binary_widget::ports::{Analytics, Clock, KeyValueStore, Ui};
use binary_widget::types::{Barrier, ContractInfo, StreamKind, SymbolInfo, TradingPeriod};
use binary_widget::{Config, Widget};

pub const NOW: i64 = 1_700_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PriceButtons(bool),
    HideBanner,
    BuyWindow(String),
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    pub events: Mutex<Vec<UiEvent>>,
    pub banner: Mutex<Option<bool>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Ui for RecordingUi {
    fn set_price_buttons_enabled(&self, enabled: bool) {
        self.events.lock().unwrap().push(UiEvent::PriceButtons(enabled));
    }

    fn rate_limit_banner(&self) -> Option<bool> {
        *self.banner.lock().unwrap()
    }

    fn hide_rate_limit_banner(&self) {
        *self.banner.lock().unwrap() = Some(false);
        self.events.lock().unwrap().push(UiEvent::HideBanner);
    }

    fn show_buy_window(&self, contract_id: &str) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::BuyWindow(contract_id.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    pub categories: Mutex<Vec<String>>,
}

impl Analytics for RecordingAnalytics {
    fn category_selected(&self, category: &str) {
        self.categories.lock().unwrap().push(category.to_string());
    }
}

#[derive(Debug)]
pub struct ManualClock(pub AtomicI64);

impl ManualClock {
    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Harness {
    pub widget: Widget,
    pub api: Arc<PaperApi>,
    pub ui: Arc<RecordingUi>,
    pub storage: MemoryStore,
    pub analytics: Arc<RecordingAnalytics>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(catalog: PaperCatalog) -> Self {
        Self::with_storage(catalog, MemoryStore::default())
    }

    pub fn with_storage(catalog: PaperCatalog, storage: MemoryStore) -> Self {
        let api = Arc::new(PaperApi::new(catalog));
        let ui = Arc::new(RecordingUi::default());
        let analytics = Arc::new(RecordingAnalytics::default());
        let clock = Arc::new(ManualClock(AtomicI64::new(NOW)));

        let widget = Widget::new(
            Config::default(),
            api.clone(),
            ui.clone(),
            Arc::new(storage.clone()),
        )
        .with_analytics(analytics.clone())
        .with_clock(clock.clone());

        Self {
            widget,
            api,
            ui,
            storage,
            analytics,
            clock,
        }
    }

    pub fn with_login(mut self, token: Option<&str>) -> Self {
        self.widget = self
            .widget
            .with_login_provider(Arc::new(StaticToken(token.map(str::to_string))));
        self
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get(key)
    }

    pub fn proposal_batches(&self) -> usize {
        self.api
            .count(|c| matches!(c, PaperCall::ForgetAll(StreamKind::Proposal)))
    }

    pub fn proposal_streams(&self) -> Vec<u64> {
        self.api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                PaperCall::SubscribeProposal { stream, .. } => Some(stream),
                _ => None,
            })
            .collect()
    }

    pub fn closed(&self, stream_id: u64) -> usize {
        self.api
            .count(|c| matches!(c, PaperCall::Close { stream, .. } if *stream == stream_id))
    }
}

pub fn symbol(symbol: &str, name: &str, submarket: &str, open: bool) -> SymbolInfo {
    SymbolInfo {
        symbol: symbol.into(),
        display_name: name.into(),
        market: "forex".into(),
        submarket: submarket.into(),
        exchange_is_open: open,
    }
}

pub fn contract(
    category: &str,
    kind: &str,
    period: (i64, i64),
    available: &[&str],
    expired: &[&str],
) -> ContractInfo {
    ContractInfo {
        contract_category: category.into(),
        contract_type: kind.into(),
        trading_period: Some(TradingPeriod {
            date_start: period.0,
            date_expiry: period.1,
        }),
        available_barriers: available.iter().map(|b| Barrier::Single(b.to_string())).collect(),
        expired_barriers: expired.iter().map(|b| Barrier::Single(b.to_string())).collect(),
    }
}

/// Hourly window with live barriers.
pub const HOUR: (i64, i64) = (NOW - 600, NOW + 3_000);
/// Daily window whose barriers all expired.
pub const DAY: (i64, i64) = (NOW - 600, NOW + 80_000);

pub fn usdjpy_contracts() -> Vec<ContractInfo> {
    vec![
        contract("callput", "CALLE", HOUR, &["151.0", "150.0", "149.0"], &[]),
        contract("callput", "PUTE", HOUR, &["151.0", "150.0", "149.0"], &[]),
        contract("callput", "CALLE", DAY, &["150.0"], &["150.0"]),
        contract("touchnotouch", "ONETOUCH", HOUR, &["152.0", "148.0"], &[]),
    ]
}

/// One open major pair, USD/JPY, plus a closed one and a minor pair.
pub fn catalog() -> PaperCatalog {
    PaperCatalog {
        symbols: vec![
            symbol("frxAUDJPY", "AUD/JPY", "minor_pairs", true),
            symbol("frxEURUSD", "EUR/USD", "major_pairs", false),
            symbol("frxUSDJPY", "USD/JPY", "major_pairs", true),
        ],
        contracts: HashMap::from([
            ("frxUSDJPY".to_string(), usdjpy_contracts()),
            (
                "frxEURUSD".to_string(),
                vec![contract("callput", "CALLE", HOUR, &["1.1"], &[])],
            ),
        ]),
        time_offset: 0,
    }
}
