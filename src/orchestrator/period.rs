use tracing::{debug, info};

use super::{KEY_PERIOD, Widget};
use crate::error::WidgetError;
use crate::helpers::contracts;
use crate::timers::LEFT_TIME;
use crate::types::{Level, NO_BARRIER, Notification, Period, TIME_LEFT};

/// Open interval: exactly 0 or exactly `window` seconds left is outside.
pub fn in_final_minutes(time_left: i64, window: i64) -> bool {
    time_left > 0 && time_left < window
}

impl Widget {
    /// Select `period`, or the persisted one if still offered, or the first.
    pub async fn select_period(&self, period: Option<Period>) {
        self.timers.cancel(LEFT_TIME);
        if let Err(e) = self.try_select_period(period).await {
            self.notifier.error(e.code(), e.message()).await;
        }
    }

    async fn try_select_period(&self, explicit: Option<Period>) -> Result<(), WidgetError> {
        let need_to_store = explicit.is_some();

        let period = match explicit {
            Some(p) => p,
            None => {
                let periods = self.shared.selection().await.periods;
                let persisted = self
                    .persisted(KEY_PERIOD)
                    .and_then(|p| p.parse::<Period>().ok())
                    .filter(|p| periods.contains(p));
                match persisted {
                    Some(p) => p,
                    None => *periods.first().ok_or(WidgetError::NoPeriod)?,
                }
            }
        };

        self.shared.set_period(period).await;
        if need_to_store {
            self.storage.set(KEY_PERIOD, &period.to_string());
        }
        info!(%period, "period selected");

        let barriers = self.derive_barriers(period).await;
        if barriers == 0 {
            self.notifier
                .show(Notification::new(
                    NO_BARRIER,
                    Level::Warning,
                    "All barriers in this trading window are expired",
                ))
                .await;
        } else {
            self.notifier.hide(NO_BARRIER).await;
        }

        let time_left = self.restart_countdown().await;
        match time_left {
            Some(t) if in_final_minutes(t, self.cfg.final_minutes_s) => {
                self.notifier
                    .show(Notification::new(
                        TIME_LEFT,
                        Level::Info,
                        "This contract can not be traded in the final 2 minutes before settlement",
                    ))
                    .await;
            }
            _ => self.notifier.hide(TIME_LEFT).await,
        }

        self.select_payout(None).await;
        Ok(())
    }

    async fn derive_barriers(&self, period: Period) -> usize {
        let barriers = self
            .shared
            .read(|s| match &s.values.category {
                Some(c) => contracts::barriers(&s.contracts, c, period),
                None => Vec::new(),
            })
            .await;
        let n = barriers.len();
        self.shared.set_barriers(barriers).await;
        n
    }

    /// Recompute the time left on the selected period and keep ticking while
    /// it is positive. Returns the time left, or None while the server time
    /// offset is unknown.
    pub async fn restart_countdown(&self) -> Option<i64> {
        self.timers.cancel(LEFT_TIME);
        let time_left = self.update_time_left().await?;

        if time_left > 0 {
            let this = self.clone();
            let tick = self.cfg.countdown_tick();
            self.timers.start(LEFT_TIME, async move {
                loop {
                    tokio::time::sleep(tick).await;
                    match this.update_time_left().await {
                        Some(t) if t > 0 => continue,
                        _ => break,
                    }
                }
                debug!("countdown finished");
            });
        }
        Some(time_left)
    }

    async fn update_time_left(&self) -> Option<i64> {
        let offset = self.shared.time_offset().await?;
        let period = self.shared.selection().await.period?;
        let time_left = period.end - (self.clock.now() + offset);
        self.shared.set_time_left(time_left).await;
        Some(time_left)
    }
}
