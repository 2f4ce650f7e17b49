use crate::types::{Barrier, Period};

/// What the user currently has picked, plus the option lists derived from
/// the catalogs. Each field is replaced as the orchestrator walks the chain
/// symbol -> category -> period -> payout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub symbol: Option<String>,
    pub display_name: Option<String>,

    pub categories: Vec<String>,
    pub category: Option<String>,
    pub contract_types: Vec<String>,

    pub periods: Vec<Period>,
    pub period: Option<Period>,
    pub barriers: Vec<Barrier>,

    pub payout: Option<u32>,

    // Seconds until the selected period expires (server time).
    pub time_left: Option<i64>,

    // Tag of the newest proposal batch; responses with an older tag are stale.
    pub proposal_req_id: u64,
}

impl Selection {
    pub fn payout_or_default(&self) -> u32 {
        self.payout.unwrap_or(1)
    }
}
