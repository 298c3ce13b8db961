use crate::helpers::{bar, client, loc, window};
use quantdle::{Diagnostics, QuantdleError, Timeframe, Warning};
use quantdle_mock::{DynamicMockConnector, MockBehavior};
use serde_json::Value;

#[tokio::test]
async fn failed_location_is_dropped_with_one_warning() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let w = window((2023, 1, 1), (2023, 1, 31));
    controller
        .set_window_behavior(w, MockBehavior::Return(vec![loc("mem://ok"), loc("mem://bad")]))
        .await;
    let good = vec![
        bar("2023-01-02", "00:00:00", 1.0),
        bar("2023-01-03", "00:00:00", 2.0),
    ];
    controller
        .set_archive_behavior(loc("mem://ok"), MockBehavior::Return(good.clone()))
        .await;
    let err = QuantdleError::extract("mem://bad", "HTTP 403 Forbidden");
    controller
        .set_archive_behavior(loc("mem://bad"), MockBehavior::Fail(err.clone()))
        .await;

    let qd = client(mock);
    let mut diag = Diagnostics::new();
    let records = qd
        .download_window("EURUSD", Timeframe::D1, &w, 4, false, &mut diag)
        .await
        .unwrap();

    assert_eq!(records, good);
    assert_eq!(
        diag.warnings(),
        [Warning::FetchFailed {
            location: "mem://bad".into(),
            error: err,
        }]
    );
}

#[tokio::test]
async fn zero_locations_skip_fetching() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_default_window_behavior(MockBehavior::Return(vec![]))
        .await;
    let qd = client(mock);
    let mut diag = Diagnostics::new();

    let records = qd
        .download_window(
            "EURUSD",
            Timeframe::M5,
            &window((2023, 1, 1), (2023, 12, 31)),
            4,
            false,
            &mut diag,
        )
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(diag.is_empty());
    assert!(controller.fetch_calls().await.is_empty());
}

#[tokio::test]
async fn authentication_failure_aborts_the_download() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let auth = QuantdleError::Authentication("invalid API credentials".into());
    controller
        .set_default_window_behavior(MockBehavior::Fail(auth.clone()))
        .await;
    let qd = client(mock);

    let err = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::H1)
        .start("2010-01-01")
        .end("2020-01-01")
        .run()
        .await
        .unwrap_err();

    assert_eq!(err, auth);
    assert_eq!(controller.resolve_calls().await.len(), 1);
    assert!(controller.fetch_calls().await.is_empty());
}

#[tokio::test]
async fn request_failure_in_a_later_window_aborts_the_call() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let first = window((2010, 1, 1), (2015, 1, 1));
    let second = window((2015, 1, 2), (2020, 1, 1));
    controller
        .set_window_behavior(first, MockBehavior::Return(vec![loc("mem://2010")]))
        .await;
    controller
        .set_archive_behavior(
            loc("mem://2010"),
            MockBehavior::Return(vec![bar("2010-01-04", "00:00:00", 1.0)]),
        )
        .await;
    let failure = QuantdleError::request("/data/EURUSD", "HTTP 502 Bad Gateway");
    controller
        .set_window_behavior(second, MockBehavior::Fail(failure.clone()))
        .await;
    let qd = client(mock);

    let err = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::H1)
        .start("2010-01-01")
        .end("2020-01-01")
        .run()
        .await
        .unwrap_err();

    assert_eq!(err, failure);
    assert_eq!(controller.resolve_calls().await.len(), 2);
    assert_eq!(controller.fetch_calls().await, vec![loc("mem://2010")]);
}

#[tokio::test]
async fn entitlement_warning_degrades_to_an_empty_result() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let not_entitled = Warning::NotEntitled {
        symbol: "US500".into(),
        timeframe: Timeframe::M1,
    };
    controller
        .set_default_window_behavior(MockBehavior::Warn(not_entitled.clone()))
        .await;
    let qd = client(mock);

    let report = qd
        .download()
        .symbol("US500")
        .timeframe(Timeframe::M1)
        .start("2023-01-01")
        .end("2023-03-31")
        .run()
        .await
        .unwrap();

    assert!(report.table.is_empty());
    assert_eq!(report.warnings, vec![not_entitled, Warning::NoData]);
    assert!(controller.fetch_calls().await.is_empty());
}

#[tokio::test]
async fn warnings_from_fetch_workers_reach_the_report() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_default_window_behavior(MockBehavior::Return(vec![
            loc("mem://a"),
            loc("mem://b"),
        ]))
        .await;
    controller
        .set_archive_behavior(
            loc("mem://a"),
            MockBehavior::Return(vec![bar("2023-01-02", "10:00:00", 1.0)]),
        )
        .await;
    let malformed = Warning::MalformedEntry {
        location: "mem://b".into(),
        entry: "EURUSD_2023.json".into(),
    };
    controller
        .set_archive_behavior(loc("mem://b"), MockBehavior::Warn(malformed.clone()))
        .await;
    let qd = client(mock);

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::H1)
        .start("2023-01-01")
        .end("2023-01-31")
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.len(), 1);
    assert_eq!(report.locations, 2);
    assert_eq!(report.warnings, vec![malformed]);
}

#[tokio::test]
async fn unparseable_record_is_a_data_error() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_default_window_behavior(MockBehavior::Return(vec![loc("mem://a")]))
        .await;
    controller
        .set_archive_behavior(
            loc("mem://a"),
            MockBehavior::Return(vec![bar("2023-13-45", "00:00:00", 1.0)]),
        )
        .await;
    let qd = client(mock);

    let err = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-31")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, QuantdleError::Data(_)), "got {err:?}");
}

#[tokio::test]
async fn null_price_in_one_record_keeps_every_row() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_default_window_behavior(MockBehavior::Return(vec![loc("mem://a")]))
        .await;
    let mut gap = bar("2023-01-03", "00:00:00", 2.0);
    gap.insert("open", Value::Null);
    gap.insert("close", Value::String("n/a".into()));
    controller
        .set_archive_behavior(
            loc("mem://a"),
            MockBehavior::Return(vec![
                bar("2023-01-02", "00:00:00", 1.0),
                gap,
                bar("2023-01-04", "00:00:00", 3.0),
            ]),
        )
        .await;
    let qd = client(mock);

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-31")
        .run()
        .await
        .unwrap();

    let table = report.table.as_records().unwrap();
    assert_eq!(table.len(), 3);
    let middle = &table.candles()[1];
    assert_eq!(middle.open, None);
    assert_eq!(middle.close, None);
    assert_eq!(middle.high, Some(2.5));
    assert!(report.warnings.is_empty());
}
