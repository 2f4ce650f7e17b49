use std::env;
use std::time::Duration;

/// Timings and constants for the widget.
///
/// Defaults match what the trading page ships with. `from_env` lets a demo
/// run shorten them (e.g. a 2s contract refresh while debugging).
#[derive(Debug, Clone)]
pub struct Config {
    // Submarket whose symbols populate the symbol picker.
    pub curated_submarket: String,

    // Contract catalog poll while a symbol is selected.
    pub contracts_refresh_ms: u64,

    // Quiescence window after an explicit payout before prices are requested.
    pub payout_debounce_ms: u64,

    // Expiry countdown tick.
    pub countdown_tick_ms: u64,

    // "Final minutes" window: no trading inside it.
    pub final_minutes_s: i64,

    // Accepted payout range (inclusive) and the multiplier sent to the API.
    pub payout_min: u32,
    pub payout_max: u32,
    pub payout_unit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            curated_submarket: "major_pairs".to_string(),
            contracts_refresh_ms: 15_000,
            payout_debounce_ms: 500,
            countdown_tick_ms: 1_000,
            final_minutes_s: 120,
            payout_min: 1,
            payout_max: 100,
            payout_unit: 1_000,
        }
    }
}

impl Config {
    /// Defaults overridden by `WIDGET_*` variables (a `.env` file is honoured).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let mut cfg = Config::default();

        if let Ok(v) = env::var("WIDGET_SUBMARKET") {
            cfg.curated_submarket = v;
        }
        if let Some(v) = env_u64("WIDGET_CONTRACTS_REFRESH_MS") {
            cfg.contracts_refresh_ms = v;
        }
        if let Some(v) = env_u64("WIDGET_PAYOUT_DEBOUNCE_MS") {
            cfg.payout_debounce_ms = v;
        }
        if let Some(v) = env_u64("WIDGET_COUNTDOWN_TICK_MS") {
            cfg.countdown_tick_ms = v;
        }
        cfg
    }

    pub fn contracts_refresh(&self) -> Duration {
        Duration::from_millis(self.contracts_refresh_ms)
    }

    pub fn payout_debounce(&self) -> Duration {
        Duration::from_millis(self.payout_debounce_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    match env::var(key) {
        Ok(v) => match v.parse::<u64>() {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!("ignoring {key}={v}: {e}");
                None
            }
        },
        Err(_) => None,
    }
}
