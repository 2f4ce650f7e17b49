use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of the active symbols catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub display_name: String,
    pub market: String,
    pub submarket: String,
    #[serde(default)]
    pub exchange_is_open: bool,
}

/// A trading window: UTC epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub start: i64,
    pub end: i64,
}

impl Period {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

// Persisted as "start_end".
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.start, self.end)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('_')
            .ok_or_else(|| format!("period '{s}' is not start_end"))?;
        let start = start.parse::<i64>().map_err(|e| format!("period start: {e}"))?;
        let end = end.parse::<i64>().map_err(|e| format!("period end: {e}"))?;
        Ok(Period { start, end })
    }
}

/// Price threshold of a contract. Range contracts carry a high/low pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Barrier {
    Single(String),
    Range(String, String),
}

impl Barrier {
    /// Numeric key used for ordering (the high side of a range).
    pub fn sort_key(&self) -> f64 {
        let s = match self {
            Barrier::Single(b) => b,
            Barrier::Range(high, _) => high,
        };
        s.parse::<f64>().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Barrier::Single(b) => write!(f, "{b}"),
            Barrier::Range(high, low) => write!(f, "{high}_{low}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPeriod {
    pub date_start: i64,
    pub date_expiry: i64,
}

/// One entry of the `contracts_for` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub contract_category: String,
    pub contract_type: String,
    #[serde(default)]
    pub trading_period: Option<TradingPeriod>,
    #[serde(default)]
    pub available_barriers: Vec<Barrier>,
    #[serde(default)]
    pub expired_barriers: Vec<Barrier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub loginid: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Ticks,
    Proposal,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Ticks => "ticks",
            StreamKind::Proposal => "proposal",
        }
    }
}

/// Parameters of one proposal (price quote) subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRequest {
    pub contract_type: String,
    pub symbol: String,
    pub start: i64,
    pub end_date: i64,
    pub payout: u64,
    pub barrier: Barrier,
    pub req_id: u64,
}

/// What the user clicked on a price button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyOrder {
    pub contract_type: String,
    pub price: f64,
    pub barrier: Barrier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyRequest {
    pub contract_type: String,
    pub price: f64,
    pub barrier: Barrier,
    pub payout: u64,
    pub symbol: String,
    pub start: i64,
    pub expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyReceipt {
    pub contract_id: String,
    pub buy_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    ReloadPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub uid: String,
    pub message: String,
    pub level: Level,
    pub dismissible: bool,
    /// Button label and what it does.
    pub action: Option<(String, NotificationAction)>,
}

impl Notification {
    pub fn new(uid: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            message: message.into(),
            level,
            dismissible: true,
            action: None,
        }
    }

    pub fn error(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(uid, Level::Error, message)
    }
}

// Stable notification keys.
pub const SYMBOL_ERROR: &str = "SYMBOL_ERROR";
pub const CONTRACT_ERROR: &str = "CONTRACT_ERROR";
pub const NO_BARRIER: &str = "NO_BARRIER";
pub const TIME_LEFT: &str = "TIME_LEFT";
pub const PROPOSAL_LIMIT: &str = "PROPOSAL_LIMIT";
pub const BUY_ERROR: &str = "BUY_ERROR";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parses_persisted_form() {
        let p: Period = "1700000000_1700003600".parse().unwrap();
        assert_eq!(p, Period::new(1_700_000_000, 1_700_003_600));
        assert_eq!(p.to_string(), "1700000000_1700003600");
        assert!("garbage".parse::<Period>().is_err());
    }

    #[test]
    fn barrier_deserializes_single_and_range() {
        let b: Vec<Barrier> = serde_json::from_str(r#"["101.5", ["102.0", "100.0"]]"#).unwrap();
        assert_eq!(b[0], Barrier::Single("101.5".into()));
        assert_eq!(b[1], Barrier::Range("102.0".into(), "100.0".into()));
        assert_eq!(b[1].sort_key(), 102.0);
    }
}
