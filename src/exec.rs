//! Order submission.

use tracing::{info, warn};

use crate::error::WidgetError;
use crate::orchestrator::Widget;
use crate::types::{BUY_ERROR, BuyOrder, BuyRequest};

impl Widget {
    /// Buy the clicked contract. Price buttons are disabled before anything
    /// is awaited; they come back only on failure, after the error is shown.
    pub async fn buy(&self, order: BuyOrder) {
        self.ui.set_price_buttons_enabled(false);

        let sel = self.shared.selection().await;
        let (Some(symbol), Some(period)) = (sel.symbol.clone(), sel.period) else {
            self.notifier.error(BUY_ERROR, WidgetError::NoPeriod.message()).await;
            self.enable_price_buttons();
            return;
        };

        let req = BuyRequest {
            contract_type: order.contract_type,
            price: order.price,
            barrier: order.barrier,
            payout: u64::from(sel.payout_or_default()) * self.cfg.payout_unit,
            symbol,
            start: period.start,
            expiry: period.end,
        };

        match self.api.buy(req).await {
            Ok(receipt) => {
                info!(contract_id = %receipt.contract_id, price = receipt.buy_price, "bought");
                self.ui.show_buy_window(&receipt.contract_id);
                self.shared.set_last_purchase(receipt).await;
                self.notifier.hide(BUY_ERROR).await;
            }
            Err(e) => {
                warn!("buy failed: {e}");
                self.notifier.error(BUY_ERROR, e.message).await;
                self.enable_price_buttons();
            }
        }
    }

    /// Re-enable the price buttons (also called when the purchase view closes).
    pub fn enable_price_buttons(&self) {
        self.ui.set_price_buttons_enabled(true);
    }
}
