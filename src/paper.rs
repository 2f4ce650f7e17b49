//! In-memory collaborators: a paper trading API that serves a fixed
//! catalog and records every call, plus a log-only UI and a memory store.
//! Used by the demo binary and the tests.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::ports::{KeyValueStore, LoginTokenProvider, StreamHandle, TradingApi, Ui};
use crate::types::{
    Barrier, BuyReceipt, BuyRequest, ContractInfo, PriceRequest, Session, StreamKind,
    SymbolInfo, TradingPeriod,
};

/// What the paper API serves. Loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperCatalog {
    pub symbols: Vec<SymbolInfo>,
    /// symbol -> contracts
    pub contracts: HashMap<String, Vec<ContractInfo>>,
    #[serde(default)]
    pub time_offset: i64,
}

impl PaperCatalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A USD/JPY catalog with an hourly and a daily window starting at `now`.
    pub fn demo(now: i64) -> Self {
        let hour = (now, now + 3_600);
        let day = (now, now + 86_400);
        let barriers = |mid: f64| -> Vec<Barrier> {
            (-2..=2)
                .map(|i| Barrier::Single(format!("{:.3}", mid + f64::from(i) * 0.25)))
                .collect()
        };

        let mut contracts = Vec::new();
        for (start, end) in [hour, day] {
            for kind in ["CALLE", "PUTE"] {
                contracts.push(ContractInfo {
                    contract_category: "callput".into(),
                    contract_type: kind.into(),
                    trading_period: Some(TradingPeriod {
                        date_start: start,
                        date_expiry: end,
                    }),
                    available_barriers: barriers(150.0),
                    expired_barriers: Vec::new(),
                });
            }
            for kind in ["ONETOUCH", "NOTOUCH"] {
                contracts.push(ContractInfo {
                    contract_category: "touchnotouch".into(),
                    contract_type: kind.into(),
                    trading_period: Some(TradingPeriod {
                        date_start: start,
                        date_expiry: end,
                    }),
                    available_barriers: barriers(151.0),
                    expired_barriers: Vec::new(),
                });
            }
        }

        Self {
            symbols: vec![
                SymbolInfo {
                    symbol: "frxUSDJPY".into(),
                    display_name: "USD/JPY".into(),
                    market: "forex".into(),
                    submarket: "major_pairs".into(),
                    exchange_is_open: true,
                },
                SymbolInfo {
                    symbol: "frxAUDJPY".into(),
                    display_name: "AUD/JPY".into(),
                    market: "forex".into(),
                    submarket: "minor_pairs".into(),
                    exchange_is_open: true,
                },
            ],
            contracts: HashMap::from([("frxUSDJPY".to_string(), contracts)]),
            time_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperOp {
    Authorize,
    TimeOffset,
    ActiveSymbols,
    ContractsFor,
    SubscribeTicks,
    SubscribeProposal,
    ForgetAll,
    Buy,
}

/// One recorded interaction, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum PaperCall {
    Authorize(String),
    TimeOffset,
    ActiveSymbols,
    ContractsFor(String),
    SubscribeTicks { symbol: String, stream: u64 },
    SubscribeProposal { req: PriceRequest, stream: u64 },
    ForgetAll(StreamKind),
    Close { kind: StreamKind, stream: u64 },
    Buy(BuyRequest),
    Disconnect,
}

type Log = Arc<Mutex<Vec<PaperCall>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug)]
pub struct PaperStream {
    kind: StreamKind,
    id: u64,
    log: Log,
}

impl StreamHandle for PaperStream {
    fn close(&self) {
        debug!(kind = self.kind.as_str(), id = self.id, "paper stream closed");
        lock(&self.log).push(PaperCall::Close {
            kind: self.kind,
            stream: self.id,
        });
    }
}

#[derive(Debug, Default)]
pub struct PaperApi {
    catalog: Mutex<PaperCatalog>,
    log: Log,
    next_stream: Mutex<u64>,

    // one-shot failures
    fail_next: Mutex<HashMap<PaperOp, ApiError>>,
    // every proposal fails with this while set
    proposal_error: Mutex<Option<ApiError>>,
    // round trip of each proposal subscription
    proposal_latency: Mutex<Duration>,
}

impl PaperApi {
    pub fn new(catalog: PaperCatalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            ..Default::default()
        }
    }

    pub fn set_catalog(&self, catalog: PaperCatalog) {
        *lock(&self.catalog) = catalog;
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: PaperOp, err: ApiError) {
        lock(&self.fail_next).insert(op, err);
    }

    pub fn fail_proposals(&self, err: Option<ApiError>) {
        *lock(&self.proposal_error) = err;
    }

    /// Delay every proposal subscription by `latency` before it answers.
    pub fn set_proposal_latency(&self, latency: Duration) {
        *lock(&self.proposal_latency) = latency;
    }

    pub fn calls(&self) -> Vec<PaperCall> {
        lock(&self.log).clone()
    }

    pub fn count(&self, pred: impl Fn(&PaperCall) -> bool) -> usize {
        lock(&self.log).iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: PaperCall) {
        lock(&self.log).push(call);
    }

    fn check(&self, op: PaperOp) -> Result<(), ApiError> {
        match lock(&self.fail_next).remove(&op) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn stream(&self, kind: StreamKind) -> (u64, PaperStream) {
        let mut n = lock(&self.next_stream);
        *n += 1;
        let id = *n;
        (
            id,
            PaperStream {
                kind,
                id,
                log: self.log.clone(),
            },
        )
    }
}

#[async_trait]
impl TradingApi for PaperApi {
    async fn authorize(&self, token: &str) -> Result<Session, ApiError> {
        self.record(PaperCall::Authorize(token.to_string()));
        self.check(PaperOp::Authorize)?;
        Ok(Session {
            loginid: "VRTJ000001".into(),
            currency: "JPY".into(),
        })
    }

    async fn time_offset(&self) -> Result<i64, ApiError> {
        self.record(PaperCall::TimeOffset);
        self.check(PaperOp::TimeOffset)?;
        Ok(lock(&self.catalog).time_offset)
    }

    async fn active_symbols(&self) -> Result<Vec<SymbolInfo>, ApiError> {
        self.record(PaperCall::ActiveSymbols);
        self.check(PaperOp::ActiveSymbols)?;
        Ok(lock(&self.catalog).symbols.clone())
    }

    async fn contracts_for(&self, symbol: &str) -> Result<Vec<ContractInfo>, ApiError> {
        self.record(PaperCall::ContractsFor(symbol.to_string()));
        self.check(PaperOp::ContractsFor)?;
        lock(&self.catalog)
            .contracts
            .get(symbol)
            .cloned()
            .ok_or_else(|| ApiError::new("InvalidSymbol", format!("Symbol {symbol} invalid")))
    }

    async fn subscribe_ticks(&self, symbol: &str) -> Result<Box<dyn StreamHandle>, ApiError> {
        self.check(PaperOp::SubscribeTicks)?;
        let (id, s) = self.stream(StreamKind::Ticks);
        self.record(PaperCall::SubscribeTicks {
            symbol: symbol.to_string(),
            stream: id,
        });
        Ok(Box::new(s))
    }

    async fn subscribe_proposal(
        &self,
        req: PriceRequest,
    ) -> Result<Box<dyn StreamHandle>, ApiError> {
        let latency = *lock(&self.proposal_latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.check(PaperOp::SubscribeProposal)?;
        if let Some(e) = lock(&self.proposal_error).clone() {
            return Err(e);
        }
        let (id, s) = self.stream(StreamKind::Proposal);
        self.record(PaperCall::SubscribeProposal { req, stream: id });
        Ok(Box::new(s))
    }

    async fn forget_all(&self, kind: StreamKind) -> Result<(), ApiError> {
        self.record(PaperCall::ForgetAll(kind));
        self.check(PaperOp::ForgetAll)
    }

    async fn buy(&self, req: BuyRequest) -> Result<BuyReceipt, ApiError> {
        self.record(PaperCall::Buy(req.clone()));
        self.check(PaperOp::Buy)?;
        Ok(BuyReceipt {
            contract_id: uuid::Uuid::new_v4().to_string(),
            buy_price: req.price,
        })
    }

    async fn disconnect(&self) {
        self.record(PaperCall::Disconnect);
    }
}

/// UI that only logs.
#[derive(Debug, Default)]
pub struct LogUi;

impl Ui for LogUi {
    fn set_price_buttons_enabled(&self, enabled: bool) {
        info!(enabled, "ui: price buttons");
    }

    fn rate_limit_banner(&self) -> Option<bool> {
        None
    }

    fn hide_rate_limit_banner(&self) {}

    fn show_buy_window(&self, contract_id: &str) {
        info!(contract_id, "ui: purchase confirmation");
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: Arc<DashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }
}

/// Login token provider returning a fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub Option<String>);

impl LoginTokenProvider for StaticToken {
    fn login_token(&self) -> Option<String> {
        self.0.clone()
    }
}
