use std::time::Duration;

use binary_widget::paper::PaperCall;

use crate::common::{Harness, catalog};

#[tokio::test(start_paused = true)]
async fn test_close_stops_timers_and_streams() {
    let h = Harness::new(catalog());
    h.widget.load_symbols().await;
    assert!(h.widget.timers().active_count() > 0);

    h.widget.close().await;

    assert_eq!(h.widget.timers().active_count(), 0);
    let opened: Vec<u64> = h
        .api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            PaperCall::SubscribeTicks { stream, .. } => Some(stream),
            PaperCall::SubscribeProposal { stream, .. } => Some(stream),
            _ => None,
        })
        .collect();
    assert_eq!(opened.len(), 7);
    for id in opened {
        assert_eq!(h.closed(id), 1, "stream {id}");
    }
    assert_eq!(h.api.calls().last(), Some(&PaperCall::Disconnect));

    let shared = h.widget.shared();
    assert!(shared.read(|s| s.ticks.is_none() && s.proposals.is_empty()).await);
    assert_eq!(shared.selection().await.time_left, None);

    // no refresh or countdown fires afterwards
    let calls = h.api.calls().len();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.api.calls().len(), calls);
    assert_eq!(shared.selection().await.time_left, None);
}

#[tokio::test(start_paused = true)]
async fn test_close_releases_pending_payout_waiters() {
    let h = Harness::new(catalog());
    h.widget.load_symbols().await;
    let batches = h.proposal_batches();

    let (accepted, ()) = tokio::join!(h.widget.select_payout(Some(9.0)), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.widget.close().await;
    });

    assert!(accepted);
    assert_eq!(h.proposal_batches(), batches);
}

#[tokio::test(start_paused = true)]
async fn test_close_during_a_slow_batch_leaves_no_live_streams() {
    let h = Harness::new(catalog());
    h.widget.load_symbols().await;
    h.api.set_proposal_latency(Duration::from_millis(50));

    tokio::join!(h.widget.request_prices(), async {
        tokio::time::sleep(Duration::from_millis(120)).await;
        h.widget.close().await;
    });

    // two answered before close, one was in flight, the rest never sent
    let batch: Vec<u64> = h
        .api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            PaperCall::SubscribeProposal { req, stream } if req.req_id == 2 => Some(stream),
            _ => None,
        })
        .collect();
    assert_eq!(batch.len(), 3);
    for id in h.proposal_streams() {
        assert_eq!(h.closed(id), 1, "stream {id}");
    }
    assert_eq!(h.widget.shared().live_proposal_count().await, 0);
}
