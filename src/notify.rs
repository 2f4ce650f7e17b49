use tracing::{debug, info, warn};

use crate::state::Shared;
use crate::types::{Level, Notification, NotificationAction};

/// Shows and hides keyed notifications in the store. A later `show` with
/// the same uid replaces the earlier one.
#[derive(Clone, Debug)]
pub struct Notifier {
    shared: Shared,
}

impl Notifier {
    pub fn new(shared: Shared) -> Self {
        Self { shared }
    }

    pub async fn show(&self, n: Notification) {
        match n.level {
            Level::Error => warn!(uid = %n.uid, "notify: {}", n.message),
            Level::Warning => warn!(uid = %n.uid, "notify: {}", n.message),
            Level::Info => info!(uid = %n.uid, "notify: {}", n.message),
        }
        self.shared.show_notification(n).await;
    }

    pub async fn error(&self, uid: &str, message: impl Into<String>) {
        self.show(Notification::error(uid, message)).await;
    }

    /// Non-dismissible error with a "Refresh page" action.
    pub async fn sticky_reload(&self, uid: &str, message: impl Into<String>) {
        self.show(Notification {
            uid: uid.to_string(),
            message: message.into(),
            level: Level::Error,
            dismissible: false,
            action: Some(("Refresh page".to_string(), NotificationAction::ReloadPage)),
        })
        .await;
    }

    pub async fn hide(&self, uid: &str) {
        debug!(uid, "notify: hide");
        self.shared.hide_notification(uid).await;
    }
}
