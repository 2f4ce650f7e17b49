use std::cmp::Ordering;

use crate::types::{Barrier, ContractInfo, Period};

// Display order of the known categories; anything else follows in catalog order.
const CATEGORY_ORDER: [&str; 4] = ["callput", "touchnotouch", "endsinout", "staysinout"];

fn push_unique<T: PartialEq>(out: &mut Vec<T>, v: T) {
    if !out.contains(&v) {
        out.push(v);
    }
}

pub fn categories(contracts: &[ContractInfo]) -> Vec<String> {
    let mut out = Vec::new();
    for c in contracts {
        push_unique(&mut out, c.contract_category.clone());
    }
    let rank = |c: &String| {
        CATEGORY_ORDER
            .iter()
            .position(|k| k == c)
            .unwrap_or(CATEGORY_ORDER.len())
    };
    // stable: unknown categories keep their relative order
    out.sort_by_key(rank);
    out
}

pub fn contract_types(contracts: &[ContractInfo], category: &str) -> Vec<String> {
    let mut out = Vec::new();
    for c in contracts.iter().filter(|c| c.contract_category == category) {
        push_unique(&mut out, c.contract_type.clone());
    }
    out
}

/// Distinct trading periods of `category`, earliest expiry first.
pub fn trading_periods(contracts: &[ContractInfo], category: &str) -> Vec<Period> {
    let mut out = Vec::new();
    for c in contracts.iter().filter(|c| c.contract_category == category) {
        if let Some(tp) = &c.trading_period {
            push_unique(&mut out, Period::new(tp.date_start, tp.date_expiry));
        }
    }
    out.sort_by_key(|p| (p.end, p.start));
    out
}

/// Barriers still tradable in `period` for `category`, highest first.
pub fn barriers(contracts: &[ContractInfo], category: &str, period: Period) -> Vec<Barrier> {
    let mut out = Vec::new();
    let matching = contracts.iter().filter(|c| {
        c.contract_category == category
            && c.trading_period
                .as_ref()
                .is_some_and(|tp| tp.date_start == period.start && tp.date_expiry == period.end)
    });
    for c in matching {
        for b in &c.available_barriers {
            if !c.expired_barriers.contains(b) {
                push_unique(&mut out, b.clone());
            }
        }
    }
    out.sort_by(|a, b| {
        b.sort_key()
            .partial_cmp(&a.sort_key())
            .unwrap_or(Ordering::Equal)
    });
    out
}
