pub mod selection;
pub mod streams;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use crate::error::ApiError;
use crate::ports::StreamHandle;
use crate::types::{
    Barrier, BuyReceipt, ContractInfo, Notification, Period, Session, SymbolInfo,
};

use selection::Selection;
use streams::{PriceStreams, ProposalKey, TicksStream};

#[derive(Debug)]
pub struct WidgetState {
    pub session: Option<Session>,
    pub time_offset: Option<i64>,

    pub symbols: Vec<SymbolInfo>,
    // (symbol, display name) for the picker.
    pub symbol_list: Vec<(String, String)>,

    pub contracts: Vec<ContractInfo>,
    pub values: Selection,

    pub ticks: Option<TicksStream>,
    pub proposals: PriceStreams,

    pub notifications: HashMap<String, Notification>,
    pub last_purchase: Option<BuyReceipt>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            session: None,
            time_offset: None,
            symbols: Vec::new(),
            symbol_list: Vec::new(),
            contracts: Vec::new(),
            values: Selection::default(),
            ticks: None,
            proposals: PriceStreams::default(),
            notifications: HashMap::new(),
            last_purchase: None,
        }
    }
}

/// The widget's state store. Readers take snapshots; every mutation goes
/// through a method here and wakes `notify` so a renderer can redraw.
#[derive(Clone, Debug, Default)]
pub struct Shared {
    state: Arc<RwLock<WidgetState>>,
    notify: Arc<Notify>,
}

impl Shared {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&WidgetState) -> R) -> R {
        let g = self.state.read().await;
        f(&g)
    }

    /// Resolves after the next mutation (or at once if one happened since
    /// the last call).
    pub async fn changed(&self) {
        self.notify.notified().await
    }

    async fn write<R>(&self, f: impl FnOnce(&mut WidgetState) -> R) -> R {
        let r = {
            let mut g = self.state.write().await;
            f(&mut g)
        };
        self.notify.notify_one();
        r
    }

    pub async fn selection(&self) -> Selection {
        self.read(|s| s.values.clone()).await
    }

    pub async fn has_session(&self) -> bool {
        self.read(|s| s.session.is_some()).await
    }

    pub async fn time_offset(&self) -> Option<i64> {
        self.read(|s| s.time_offset).await
    }

    pub async fn notification(&self, uid: &str) -> Option<Notification> {
        self.read(|s| s.notifications.get(uid).cloned()).await
    }

    /// True when a response tagged `req_id` belongs to the newest batch.
    pub async fn is_current_proposal(&self, req_id: u64) -> bool {
        self.read(|s| s.values.proposal_req_id == req_id).await
    }

    pub async fn set_session(&self, session: Session) {
        self.write(|s| s.session = Some(session)).await
    }

    pub async fn set_time_offset(&self, offset: i64) {
        self.write(|s| s.time_offset = Some(offset)).await
    }

    pub async fn set_symbols(&self, symbols: Vec<SymbolInfo>, list: Vec<(String, String)>) {
        self.write(|s| {
            s.symbols = symbols;
            s.symbol_list = list;
        })
        .await
    }

    pub async fn set_symbol(&self, symbol: &str, display_name: Option<String>) {
        self.write(|s| {
            s.values.symbol = Some(symbol.to_string());
            s.values.display_name = display_name;
        })
        .await
    }

    pub async fn set_contracts(&self, contracts: Vec<ContractInfo>) {
        self.write(|s| s.contracts = contracts).await
    }

    pub async fn set_categories(&self, categories: Vec<String>) {
        self.write(|s| s.values.categories = categories).await
    }

    pub async fn set_category(&self, category: &str) {
        self.write(|s| s.values.category = Some(category.to_string())).await
    }

    pub async fn set_contract_types(&self, types: Vec<String>) {
        self.write(|s| s.values.contract_types = types).await
    }

    pub async fn set_periods(&self, periods: Vec<Period>) {
        self.write(|s| s.values.periods = periods).await
    }

    pub async fn set_period(&self, period: Period) {
        self.write(|s| s.values.period = Some(period)).await
    }

    pub async fn set_barriers(&self, barriers: Vec<Barrier>) {
        self.write(|s| s.values.barriers = barriers).await
    }

    pub async fn set_payout(&self, payout: u32) {
        self.write(|s| s.values.payout = Some(payout)).await
    }

    pub async fn set_time_left(&self, time_left: i64) {
        self.write(|s| s.values.time_left = Some(time_left)).await
    }

    /// Take the live ticks stream out of the store.
    pub async fn take_ticks(&self) -> Option<TicksStream> {
        self.write(|s| s.ticks.take()).await
    }

    pub async fn set_ticks(&self, symbol: &str, handle: Box<dyn StreamHandle>) {
        self.write(|s| {
            s.ticks = Some(TicksStream {
                symbol: symbol.to_string(),
                handle,
            })
        })
        .await
    }

    /// Remove the whole proposal batch (live and failed entries) and return
    /// the live handles for closing.
    pub async fn drain_proposals(&self) -> Vec<Box<dyn StreamHandle>> {
        self.write(|s| s.proposals.drain()).await
    }

    /// Bump and return the proposal request id.
    pub async fn next_proposal_req_id(&self) -> u64 {
        self.write(|s| {
            s.values.proposal_req_id += 1;
            s.values.proposal_req_id
        })
        .await
    }

    /// Store a freshly opened proposal stream. If the batch was superseded
    /// meanwhile the handle comes back as `Err` and the caller closes it.
    pub async fn insert_proposal(
        &self,
        key: ProposalKey,
        handle: Box<dyn StreamHandle>,
        req_id: u64,
    ) -> Result<(), Box<dyn StreamHandle>> {
        self.write(|s| {
            if s.values.proposal_req_id != req_id {
                return Err(handle);
            }
            if let Some(prev) = s.proposals.insert_live(key, handle) {
                prev.close();
            }
            Ok(())
        })
        .await
    }

    pub async fn insert_failed_proposal(
        &self,
        key: ProposalKey,
        error: ApiError,
        req_id: u64,
    ) {
        self.write(|s| {
            if s.values.proposal_req_id == req_id {
                s.proposals.insert_failed(key, error);
            }
        })
        .await
    }

    pub async fn live_proposal_count(&self) -> usize {
        self.read(|s| s.proposals.live.len()).await
    }

    pub async fn show_notification(&self, n: Notification) {
        self.write(|s| {
            s.notifications.insert(n.uid.clone(), n);
        })
        .await
    }

    pub async fn hide_notification(&self, uid: &str) {
        self.write(|s| {
            s.notifications.remove(uid);
        })
        .await
    }

    pub async fn set_last_purchase(&self, receipt: BuyReceipt) {
        self.write(|s| s.last_purchase = Some(receipt)).await
    }

    /// Final teardown: hand back every stream handle and clear the
    /// countdown. The proposal request id is bumped so a batch still in
    /// flight has its late handles refused.
    pub async fn teardown(&self) -> Vec<Box<dyn StreamHandle>> {
        self.write(|s| {
            s.values.proposal_req_id += 1;
            let mut handles = s.proposals.drain();
            if let Some(t) = s.ticks.take() {
                handles.push(t.handle);
            }
            s.values.time_left = None;
            handles
        })
        .await
    }
}
