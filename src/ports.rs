//! Collaborators the widget talks to but does not own.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{
    BuyReceipt, BuyRequest, ContractInfo, PriceRequest, Session, StreamKind, SymbolInfo,
};

/// A live subscription that can be torn down.
pub trait StreamHandle: Send + Sync + std::fmt::Debug {
    fn close(&self);
}

#[async_trait]
pub trait TradingApi: Send + Sync {
    async fn authorize(&self, token: &str) -> Result<Session, ApiError>;

    /// Server epoch minus local epoch, in seconds.
    async fn time_offset(&self) -> Result<i64, ApiError>;

    async fn active_symbols(&self) -> Result<Vec<SymbolInfo>, ApiError>;
    async fn contracts_for(&self, symbol: &str) -> Result<Vec<ContractInfo>, ApiError>;

    async fn subscribe_ticks(&self, symbol: &str) -> Result<Box<dyn StreamHandle>, ApiError>;
    async fn subscribe_proposal(&self, req: PriceRequest)
        -> Result<Box<dyn StreamHandle>, ApiError>;

    /// Ask the server to drop every stream of `kind`.
    async fn forget_all(&self, kind: StreamKind) -> Result<(), ApiError>;

    async fn buy(&self, req: BuyRequest) -> Result<BuyReceipt, ApiError>;

    async fn disconnect(&self);
}

/// The rendering layer: the price-button overlay, the page's own rate-limit
/// banner, and the purchase confirmation view.
pub trait Ui: Send + Sync {
    fn set_price_buttons_enabled(&self, enabled: bool);
    /// Some(visible) when the banner exists on the page.
    fn rate_limit_banner(&self) -> Option<bool>;
    fn hide_rate_limit_banner(&self);
    fn show_buy_window(&self, contract_id: &str);
}

/// Durable key-value storage (persisted selections and the credential list).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

pub trait LoginTokenProvider: Send + Sync {
    fn login_token(&self) -> Option<String>;
}

pub trait Analytics: Send + Sync {
    fn category_selected(&self, category: &str);
}

pub trait Clock: Send + Sync {
    /// Local UTC epoch seconds.
    fn now(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
