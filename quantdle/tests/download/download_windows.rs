use crate::helpers::{client, day, window};
use quantdle::{QuantdleError, Timeframe, Warning};
use quantdle_mock::DynamicMockConnector;

#[tokio::test]
async fn ten_year_range_is_split_into_windows() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::H1)
        .start("2010-01-01")
        .end("2019-12-31")
        .max_window_years(5.0)
        .run()
        .await
        .unwrap();

    let calls = controller.resolve_calls().await;
    assert!(calls.len() >= 2, "expected several windows, got {calls:?}");
    assert_eq!(calls.len(), report.windows.len());
    assert_eq!(
        report.windows,
        vec![
            window((2010, 1, 1), (2015, 1, 1)),
            window((2015, 1, 2), (2019, 12, 31)),
        ]
    );
    for ((symbol, tf, w), expected) in calls.iter().zip(&report.windows) {
        assert_eq!(symbol, "EURUSD");
        assert_eq!(*tf, Timeframe::H1);
        assert_eq!(w, expected);
    }
}

#[tokio::test]
async fn six_month_range_is_a_single_window() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start(day(2023, 1, 1))
        .end(day(2023, 6, 30))
        .run()
        .await
        .unwrap();

    let calls = controller.resolve_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].2, window((2023, 1, 1), (2023, 6, 30)));
    assert_eq!(report.locations, 0);
    assert!(report.table.is_empty());
    assert_eq!(report.warnings, vec![Warning::NoData]);
}

#[tokio::test]
async fn windows_cover_the_range_in_order() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);

    qd.download()
        .symbol("XAUUSD")
        .timeframe(Timeframe::M15)
        .start("2020-01-01")
        .end("2020-12-31")
        .max_window_years(0.25)
        .run()
        .await
        .unwrap();

    let windows: Vec<_> = controller
        .resolve_calls()
        .await
        .into_iter()
        .map(|(_, _, w)| w)
        .collect();
    assert!(windows.len() > 1);
    assert_eq!(windows.first().unwrap().start, day(2020, 1, 1));
    assert_eq!(windows.last().unwrap().end, day(2020, 12, 31));
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end.succ_opt(), Some(pair[1].start));
    }
}

#[tokio::test]
async fn datetime_inputs_are_truncated_to_dates() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);
    let start = day(2023, 3, 1).and_hms_opt(15, 30, 0).unwrap();
    let end = day(2023, 3, 2).and_hms_opt(0, 0, 1).unwrap().and_utc();

    qd.download()
        .symbol("EURUSD")
        .timeframe(Timeframe::M1)
        .start(start)
        .end(end)
        .run()
        .await
        .unwrap();

    assert_eq!(
        controller.resolve_calls().await[0].2,
        window((2023, 3, 1), (2023, 3, 2))
    );
}

#[tokio::test]
async fn inverted_range_fails_before_any_request() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);

    let err = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::H1)
        .start("2024-01-02")
        .end("2024-01-01")
        .run()
        .await
        .unwrap_err();

    assert_eq!(
        err,
        QuantdleError::invalid_range(day(2024, 1, 2), day(2024, 1, 1))
    );
    assert!(controller.resolve_calls().await.is_empty());
}

#[tokio::test]
async fn bad_inputs_fail_before_any_request() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);
    let base = || {
        qd.download()
            .symbol("EURUSD")
            .timeframe(Timeframe::H1)
            .start("2024-01-01")
            .end("2024-02-01")
    };

    let cases = vec![
        base().start("01/02/2024"),
        base().concurrency(0),
        base().max_window_years(0.0),
        base().max_window_years(f64::NAN),
        base().symbol("   "),
    ];
    for builder in cases {
        let err = builder.run().await.unwrap_err();
        assert!(matches!(err, QuantdleError::InvalidArg(_)), "got {err:?}");
    }

    let missing = qd.download().symbol("EURUSD").start("2024-01-01").end("2024-02-01");
    assert!(matches!(
        missing.run().await.unwrap_err(),
        QuantdleError::InvalidArg(_)
    ));
    assert!(controller.resolve_calls().await.is_empty());
}
