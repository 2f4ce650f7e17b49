use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{KEY_PAYOUT, Widget};
use crate::timers::SET_PAYOUT;

impl Widget {
    fn validate_payout(&self, payout: f64) -> Option<u32> {
        let ok = payout.is_finite()
            && payout.fract() == 0.0
            && payout >= f64::from(self.cfg.payout_min)
            && payout <= f64::from(self.cfg.payout_max);
        ok.then_some(payout as u32)
    }

    /// Set the payout and request prices for it.
    ///
    /// An explicit payout must be an integer within the configured range;
    /// anything else returns `false` and changes nothing. Explicit values
    /// are debounced, defaulted ones request prices straight away. Every
    /// call resolves once the price request it is waiting on has gone out.
    pub async fn select_payout(&self, payout: Option<f64>) -> bool {
        let explicit = match payout {
            Some(p) => match self.validate_payout(p) {
                Some(v) => Some(v),
                None => {
                    debug!(payout = p, "payout rejected");
                    return false;
                }
            },
            None => None,
        };
        let need_to_store = explicit.is_some();

        let payout = explicit
            .or_else(|| {
                self.persisted(KEY_PAYOUT)
                    .and_then(|v| v.parse::<u32>().ok())
                    .filter(|v| *v > 0)
            })
            .unwrap_or(1);

        self.shared.set_payout(payout).await;
        if need_to_store {
            self.storage.set(KEY_PAYOUT, &payout.to_string());
        }
        info!(payout, "payout selected");

        let delay = if need_to_store {
            self.cfg.payout_debounce()
        } else {
            Duration::ZERO
        };
        let mut done = self.arm_price_request(delay).await;
        // Err only when the widget was closed before the request fired.
        let _ = done.wait_for(|fired| *fired).await;
        true
    }

    /// (Re)start the debounce timer. Callers arriving while it is pending
    /// join the same completion signal.
    async fn arm_price_request(&self, delay: Duration) -> watch::Receiver<bool> {
        let mut pending = self.payout_pending.lock().await;
        let rx = match pending.as_ref() {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = watch::channel(false);
                *pending = Some(tx);
                rx
            }
        };

        let this = self.clone();
        self.timers.start_timeout(SET_PAYOUT, delay, async move {
            let tx = this.payout_pending.lock().await.take();
            this.request_prices().await;
            if let Some(tx) = tx {
                let _ = tx.send(true);
            }
        });
        rx
    }
}
