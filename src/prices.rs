//! Proposal (price quote) streams for the current selection.

use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::orchestrator::Widget;
use crate::state::streams::ProposalKey;
use crate::types::{PROPOSAL_LIMIT, PriceRequest, StreamKind};

impl Widget {
    /// Replace the proposal batch: close every stream of the previous batch,
    /// bump the request id, then open one stream per (contract type,
    /// barrier) pair tagged with the new id. A batch stops opening streams
    /// once a newer batch or `close` has replaced its id.
    pub async fn request_prices(&self) {
        let sel = self.shared.selection().await;
        let (Some(symbol), Some(period)) = (sel.symbol.clone(), sel.period) else {
            debug!("prices: no symbol or period selected");
            return;
        };
        let payout = u64::from(sel.payout_or_default()) * self.cfg.payout_unit;

        if let Err(e) = self.api.forget_all(StreamKind::Proposal).await {
            warn!("forget proposals failed: {e}");
        }
        for h in self.shared.drain_proposals().await {
            h.close();
        }
        let req_id = self.shared.next_proposal_req_id().await;

        info!(
            req_id,
            %symbol,
            types = sel.contract_types.len(),
            barriers = sel.barriers.len(),
            "requesting prices"
        );

        for contract_type in &sel.contract_types {
            for barrier in &sel.barriers {
                // superseded by a newer batch or by teardown
                if !self.shared.is_current_proposal(req_id).await {
                    debug!(req_id, "proposal batch stale, stopping");
                    return;
                }
                let key = ProposalKey {
                    contract_type: contract_type.clone(),
                    barrier: barrier.clone(),
                };
                let req = PriceRequest {
                    contract_type: contract_type.clone(),
                    symbol: symbol.clone(),
                    start: period.start,
                    end_date: period.end,
                    payout,
                    barrier: barrier.clone(),
                    req_id,
                };

                match self.api.subscribe_proposal(req).await {
                    Ok(handle) => {
                        if let Err(stale) = self.shared.insert_proposal(key, handle, req_id).await {
                            debug!(req_id, "proposal batch superseded, closing");
                            stale.close();
                        }
                    }
                    Err(e) if e.is_rate_limit() => self.on_rate_limit(e).await,
                    Err(e) => {
                        // one per barrier would flood the user; keep it in state only
                        debug!(req_id, %contract_type, %barrier, "proposal failed: {e}");
                        self.shared.insert_failed_proposal(key, e, req_id).await;
                    }
                }
            }
        }
    }

    async fn on_rate_limit(&self, e: ApiError) {
        if self.ui.rate_limit_banner() == Some(true) {
            self.ui.hide_rate_limit_banner();
        }
        self.notifier.sticky_reload(PROPOSAL_LIMIT, e.message).await;
    }
}
