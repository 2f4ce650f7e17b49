use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use binary_widget::paper::{LogUi, MemoryStore, PaperApi, PaperCatalog};
use binary_widget::ports::{Clock, SystemClock};
use binary_widget::types::BuyOrder;
use binary_widget::state::Shared;
use binary_widget::{Config, Widget};

/// Stand-in for the page renderer: redraws whenever the store changes.
async fn render(shared: Shared) {
    loop {
        shared.changed().await;
        let (req_id, live, failed) = shared
            .read(|s| {
                let failed: Vec<String> = s
                    .proposals
                    .failed
                    .iter()
                    .map(|(k, e)| format!("{}@{}: {}", k.contract_type, k.barrier, e.code))
                    .collect();
                (s.values.proposal_req_id, s.proposals.live.len(), failed)
            })
            .await;
        debug!(req_id, live, ?failed, "render");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Basic logging: set RUST_LOG=info (or debug) to see output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = Config::from_env();

    // PAPER_CATALOG=path.json serves a recorded catalog instead of the demo one.
    let catalog = match std::env::var("PAPER_CATALOG") {
        Ok(path) => PaperCatalog::from_json(&std::fs::read_to_string(path)?)?,
        Err(_) => PaperCatalog::demo(SystemClock.now()),
    };

    let api = Arc::new(PaperApi::new(catalog));
    let widget = Widget::new(cfg, api.clone(), Arc::new(LogUi), Arc::new(MemoryStore::default()));
    let renderer = tokio::spawn(render(widget.shared().clone()));

    widget.load_symbols().await;

    let sel = widget.shared().selection().await;
    info!(
        symbol = ?sel.symbol,
        category = ?sel.category,
        period = ?sel.period.map(|p| p.to_string()),
        barriers = sel.barriers.len(),
        req_id = sel.proposal_req_id,
        "selection ready"
    );

    widget.select_payout(Some(5.0)).await;

    if let (Some(contract_type), Some(barrier)) = (sel.contract_types.first(), sel.barriers.first()) {
        widget
            .buy(BuyOrder {
                contract_type: contract_type.clone(),
                price: 500.0,
                barrier: barrier.clone(),
            })
            .await;
    }

    tokio::time::sleep(Duration::from_secs(3)).await;
    let time_left = widget.shared().selection().await.time_left;
    info!(?time_left, calls = api.calls().len(), "shutting down");

    widget.close().await;
    renderer.abort();
    Ok(())
}
