use binary_widget::ApiError;
use binary_widget::paper::{PaperCall, PaperOp};
use binary_widget::types::{BUY_ERROR, Barrier, BuyOrder, Notification};

use crate::common::{HOUR, Harness, UiEvent, catalog};

fn order() -> BuyOrder {
    BuyOrder {
        contract_type: "CALLE".into(),
        price: 512.0,
        barrier: Barrier::Single("150.0".into()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_buy_success_opens_confirmation() {
    let h = Harness::new(catalog());
    h.widget.load_symbols().await;
    h.widget.select_payout(Some(4.0)).await;
    h.widget
        .shared()
        .show_notification(Notification::error(BUY_ERROR, "old failure"))
        .await;

    h.widget.buy(order()).await;

    let req = h
        .api
        .calls()
        .into_iter()
        .find_map(|c| match c {
            PaperCall::Buy(req) => Some(req),
            _ => None,
        })
        .expect("buy sent");
    assert_eq!(req.payout, 4_000);
    assert_eq!(req.symbol, "frxUSDJPY");
    assert_eq!((req.start, req.expiry), HOUR);

    let receipt = h
        .widget
        .shared()
        .read(|s| s.last_purchase.clone())
        .await
        .expect("receipt stored");
    assert_eq!(
        h.ui.events(),
        vec![UiEvent::PriceButtons(false), UiEvent::BuyWindow(receipt.contract_id)]
    );
    assert!(h.widget.shared().notification(BUY_ERROR).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_buy_failure_reenables_after_notifying() {
    let h = Harness::new(catalog());
    h.widget.load_symbols().await;
    h.api.fail_next(PaperOp::Buy, ApiError::new("InsufficientBalance", "Your account balance is insufficient"));

    h.widget.buy(order()).await;

    let n = h.widget.shared().notification(BUY_ERROR).await.expect("shown");
    assert_eq!(n.message, "Your account balance is insufficient");
    assert_eq!(
        h.ui.events(),
        vec![UiEvent::PriceButtons(false), UiEvent::PriceButtons(true)]
    );
    assert!(h.widget.shared().read(|s| s.last_purchase.is_none()).await);
}

#[tokio::test(start_paused = true)]
async fn test_buy_without_selection_fails_cleanly() {
    let h = Harness::new(catalog());

    h.widget.buy(order()).await;

    assert!(h.widget.shared().notification(BUY_ERROR).await.is_some());
    assert_eq!(h.api.count(|c| matches!(c, PaperCall::Buy(_))), 0);
    assert_eq!(h.ui.events().last(), Some(&UiEvent::PriceButtons(true)));
}
