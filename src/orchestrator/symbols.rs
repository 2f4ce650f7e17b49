use tracing::{debug, info};

use super::{KEY_CLIENT_TOKENS, KEY_DISPLAY_NAME, KEY_SYMBOL, Widget};
use crate::error::WidgetError;
use crate::helpers::symbols;
use crate::timers::CONTRACTS_TIMER;
use crate::types::{SYMBOL_ERROR, StreamKind};

impl Widget {
    /// Authorize once per widget. Skipped when there is no token provider,
    /// a session already exists, the provider has no token, or no client
    /// tokens were ever stored.
    pub(crate) async fn authorize(&self) -> Result<(), WidgetError> {
        let Some(login) = &self.login else {
            return Ok(());
        };
        if self.shared.has_session().await {
            return Ok(());
        }
        let Some(token) = login.login_token().filter(|t| !t.is_empty()) else {
            return Ok(());
        };
        if self.storage.get(KEY_CLIENT_TOKENS).is_none() {
            debug!("authorize: no stored client tokens");
            return Ok(());
        }

        let session = self.api.authorize(&token).await?;
        info!(loginid = %session.loginid, "authorized");
        self.shared.set_session(session).await;
        Ok(())
    }

    /// Page-load entry point.
    pub async fn load_symbols(&self) {
        self.timers.cancel(CONTRACTS_TIMER);
        if let Err(e) = self.try_load_symbols().await {
            self.notifier.error(e.code(), e.message()).await;
        }
    }

    async fn try_load_symbols(&self) -> Result<(), WidgetError> {
        self.authorize().await?;

        let offset = self.api.time_offset().await?;
        self.shared.set_time_offset(offset).await;

        let catalog = self.api.active_symbols().await?;
        let list = symbols::picker_list(&catalog, &self.cfg.curated_submarket);
        info!(symbols = catalog.len(), curated = list.len(), "symbols loaded");
        self.shared.set_symbols(catalog, list).await;

        self.select_symbol(None).await;
        Ok(())
    }

    /// Select `symbol`, or the persisted one, or the first open curated one.
    pub async fn select_symbol(&self, symbol: Option<&str>) {
        if let Err(e) = self.try_select_symbol(symbol).await {
            self.notifier.error(SYMBOL_ERROR, e.message()).await;
        }
    }

    async fn try_select_symbol(&self, explicit: Option<&str>) -> Result<(), WidgetError> {
        let explicit = explicit.filter(|s| !s.is_empty()).map(str::to_string);
        let need_to_store = explicit.is_some();

        let symbol = match explicit.or_else(|| self.persisted(KEY_SYMBOL)) {
            Some(s) => s,
            None => self
                .shared
                .read(|s| symbols::first_open(&s.symbols, &self.cfg.curated_submarket))
                .await
                .ok_or(WidgetError::NoSymbol)?,
        };
        let display_name = self
            .shared
            .read(|s| symbols::display_name(&s.symbols, &symbol))
            .await;

        self.notifier.hide(SYMBOL_ERROR).await;
        // the display name is stored on every selection, defaulted or not
        if let Some(name) = &display_name {
            self.storage.set(KEY_DISPLAY_NAME, name);
        }
        self.shared.set_symbol(&symbol, display_name).await;
        if need_to_store {
            self.storage.set(KEY_SYMBOL, &symbol);
        }
        info!(%symbol, "symbol selected");

        self.load_contracts().await;
        self.subscribe_ticks(&symbol).await
    }

    /// Replace the ticks stream: the old handle is closed before the new
    /// subscription is requested.
    async fn subscribe_ticks(&self, symbol: &str) -> Result<(), WidgetError> {
        if let Some(prev) = self.shared.take_ticks().await {
            debug!(symbol = %prev.symbol, "closing ticks stream");
            prev.handle.close();
        }
        self.api.forget_all(StreamKind::Ticks).await?;

        let handle = self.api.subscribe_ticks(symbol).await?;
        self.shared.set_ticks(symbol, handle).await;
        Ok(())
    }
}
