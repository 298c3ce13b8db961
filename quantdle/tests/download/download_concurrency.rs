use std::time::Duration;

use crate::helpers::{bar, client, loc, window};
use quantdle::{Diagnostics, QuantdleError, Timeframe};
use quantdle_mock::{DynamicMockConnector, MockBehavior};

async fn eight_archives() -> (
    std::sync::Arc<dyn quantdle::QuantdleConnector>,
    quantdle_mock::DynamicMockController,
) {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let locations: Vec<_> = (0..8).map(|i| loc(&format!("mem://{i}"))).collect();
    controller
        .set_default_window_behavior(MockBehavior::Return(locations.clone()))
        .await;
    for (i, l) in locations.into_iter().enumerate() {
        let date = format!("2023-01-{:02}", i + 1);
        controller
            .set_archive_behavior(l, MockBehavior::Return(vec![bar(&date, "00:00:00", 1.0)]))
            .await;
    }
    controller.set_fetch_delay(Duration::from_millis(30)).await;
    (mock, controller)
}

#[tokio::test]
async fn in_flight_fetches_are_bounded_by_concurrency() {
    let (mock, controller) = eight_archives().await;
    let qd = client(mock);
    let mut diag = Diagnostics::new();

    let records = qd
        .download_window(
            "EURUSD",
            Timeframe::D1,
            &window((2023, 1, 1), (2023, 1, 31)),
            2,
            false,
            &mut diag,
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 8);
    assert_eq!(controller.fetch_calls().await.len(), 8);
    let peak = controller.max_concurrent_fetches();
    assert!(peak <= 2, "peak in-flight fetches {peak} exceeded limit");
    assert!(peak >= 1);
}

#[tokio::test]
async fn archives_are_fetched_in_parallel() {
    let (mock, controller) = eight_archives().await;
    let qd = client(mock);

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-31")
        .concurrency(8)
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.len(), 8);
    assert!(controller.max_concurrent_fetches() > 1);
    let days: Vec<_> = report
        .table
        .as_records()
        .unwrap()
        .iter()
        .map(|c| c.datetime.date().to_string())
        .collect();
    let mut sorted = days.clone();
    sorted.sort();
    assert_eq!(days, sorted);
}

#[tokio::test]
async fn zero_concurrency_is_rejected() {
    let (mock, controller) = eight_archives().await;
    let qd = client(mock);
    let mut diag = Diagnostics::new();

    let err = qd
        .download_window(
            "EURUSD",
            Timeframe::D1,
            &window((2023, 1, 1), (2023, 1, 31)),
            0,
            false,
            &mut diag,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, QuantdleError::InvalidArg(_)));
    assert!(controller.resolve_calls().await.is_empty());
}
