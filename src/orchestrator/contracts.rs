use tracing::{debug, info};

use super::{KEY_CATEGORY, Widget};
use crate::error::WidgetError;
use crate::helpers::contracts;
use crate::timers::CONTRACTS_TIMER;
use crate::types::CONTRACT_ERROR;

impl Widget {
    /// Fetch contracts for the selected symbol, start the background
    /// refresh, then pick a category.
    pub async fn load_contracts(&self) {
        self.timers.cancel(CONTRACTS_TIMER);
        if let Err(e) = self.try_load_contracts().await {
            self.notifier.error(CONTRACT_ERROR, e.message()).await;
        }
    }

    async fn try_load_contracts(&self) -> Result<(), WidgetError> {
        let symbol = self.shared.selection().await.symbol.ok_or(WidgetError::NoSymbol)?;

        self.notifier.hide(CONTRACT_ERROR).await;
        let catalog = self.api.contracts_for(&symbol).await?;
        info!(%symbol, contracts = catalog.len(), "contracts loaded");
        self.shared.set_contracts(catalog).await;

        self.schedule_contracts_refresh();
        self.derive_categories().await;
        self.select_category(None).await;
        Ok(())
    }

    fn schedule_contracts_refresh(&self) {
        let this = self.clone();
        let every = self.cfg.contracts_refresh();
        self.timers.start(CONTRACTS_TIMER, async move {
            loop {
                tokio::time::sleep(every).await;
                if let Err(e) = this.refresh_contracts().await {
                    // stays stopped until the next explicit load
                    this.notifier.error(e.code(), e.message()).await;
                    break;
                }
            }
        });
    }

    /// Background refresh: new catalog, new categories and periods. The
    /// current category and period are left as they are.
    pub(crate) async fn refresh_contracts(&self) -> Result<(), WidgetError> {
        let Some(symbol) = self.shared.selection().await.symbol else {
            return Ok(());
        };
        let catalog = self.api.contracts_for(&symbol).await?;
        debug!(%symbol, contracts = catalog.len(), "contracts refreshed");
        self.shared.set_contracts(catalog).await;

        self.derive_categories().await;
        self.derive_periods().await;
        Ok(())
    }

    async fn derive_categories(&self) {
        let categories = self.shared.read(|s| contracts::categories(&s.contracts)).await;
        self.shared.set_categories(categories).await;
    }

    async fn derive_contract_types(&self) {
        let types = self
            .shared
            .read(|s| match &s.values.category {
                Some(c) => contracts::contract_types(&s.contracts, c),
                None => Vec::new(),
            })
            .await;
        self.shared.set_contract_types(types).await;
    }

    pub(crate) async fn derive_periods(&self) {
        let periods = self
            .shared
            .read(|s| match &s.values.category {
                Some(c) => contracts::trading_periods(&s.contracts, c),
                None => Vec::new(),
            })
            .await;
        self.shared.set_periods(periods).await;
    }

    /// Select `category`, or the persisted one, or the first available.
    pub async fn select_category(&self, category: Option<&str>) {
        if let Err(e) = self.try_select_category(category).await {
            self.notifier.error(e.code(), e.message()).await;
        }
    }

    async fn try_select_category(&self, explicit: Option<&str>) -> Result<(), WidgetError> {
        let explicit = explicit.filter(|c| !c.is_empty()).map(str::to_string);
        let need_to_store = explicit.is_some();

        let category = match explicit.or_else(|| self.persisted(KEY_CATEGORY)) {
            Some(c) => c,
            None => self
                .shared
                .selection()
                .await
                .categories
                .first()
                .cloned()
                .ok_or(WidgetError::NoCategory)?,
        };

        if let Some(analytics) = &self.analytics {
            analytics.category_selected(&category);
        }

        self.shared.set_category(&category).await;
        if need_to_store {
            self.storage.set(KEY_CATEGORY, &category);
        }
        info!(%category, "category selected");

        self.derive_contract_types().await;
        self.derive_periods().await;
        self.select_period(None).await;
        Ok(())
    }
}
