use std::sync::Arc;

use crate::helpers::{RecordingProgress, bar, client, day, loc};
use quantdle::{
    DuplicatePolicy, OutputFormat, Quantdle, QuantdleError, Table, Timeframe, Warning,
};
use quantdle_mock::{DynamicMockConnector, MockBehavior, MockConnector};

fn fixture_client() -> Quantdle {
    client(Arc::new(MockConnector::new()))
}

#[tokio::test]
async fn downloads_and_assembles_fixture_candles() {
    let qd = fixture_client();

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-10")
        .run()
        .await
        .unwrap();

    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.locations, 1);
    let table = report.table.as_records().unwrap();
    assert_eq!(table.len(), 10);
    assert_eq!(
        table.time_range(),
        Some((
            day(2023, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            day(2023, 1, 10).and_hms_opt(0, 0, 0).unwrap(),
        ))
    );
    let first = &table.candles()[0];
    assert!(first.low.zip(first.high).is_some_and(|(l, h)| l <= h));
    assert!(first.volume.is_some());
    assert!(first.spread.is_some());
}

#[tokio::test]
async fn candles_from_all_windows_are_merged_in_order() {
    let qd = fixture_client();

    let report = qd
        .download()
        .symbol("GBPUSD")
        .timeframe(Timeframe::D1)
        .start("2019-12-30")
        .end("2020-01-02")
        .max_window_years(0.003)
        .run()
        .await
        .unwrap();

    assert_eq!(report.windows.len(), 2);
    let days: Vec<_> = report
        .table
        .as_records()
        .unwrap()
        .iter()
        .map(|c| c.datetime.date())
        .collect();
    assert_eq!(
        days,
        vec![
            day(2019, 12, 30),
            day(2019, 12, 31),
            day(2020, 1, 1),
            day(2020, 1, 2),
        ]
    );
}

#[tokio::test]
async fn restricted_symbol_yields_empty_schema_and_warnings() {
    let qd = fixture_client();

    let report = qd
        .download()
        .symbol("US500")
        .timeframe(Timeframe::H1)
        .start("2020-01-01")
        .end("2020-06-30")
        .run()
        .await
        .unwrap();

    let table = report.table.as_records().unwrap();
    assert!(table.is_empty());
    assert_eq!(
        table.columns(),
        [
            "datetime",
            "open",
            "high",
            "low",
            "close",
            "volume",
            "spread",
            "spreadmax",
            "spreadopen"
        ]
    );
    assert_eq!(
        report.warnings,
        vec![
            Warning::NotEntitled {
                symbol: "US500".into(),
                timeframe: Timeframe::H1,
            },
            Warning::NoData,
        ]
    );
}

#[tokio::test]
async fn corrupt_archive_only_drops_its_own_year() {
    let qd = fixture_client();

    let report = qd
        .download()
        .symbol("FLAKY")
        .timeframe(Timeframe::D1)
        .start("2021-12-30")
        .end("2022-01-02")
        .run()
        .await
        .unwrap();

    assert_eq!(report.locations, 2);
    assert_eq!(report.table.len(), 2);
    assert_eq!(report.warnings.len(), 1);
    match &report.warnings[0] {
        Warning::FetchFailed { location, error } => {
            assert!(location.contains("2021-12-30"), "{location}");
            assert!(matches!(error, QuantdleError::Extract { .. }));
        }
        other => panic!("unexpected warning: {other:?}"),
    }
}

#[tokio::test]
async fn resolver_failure_surfaces_to_the_caller() {
    let qd = fixture_client();

    let err = qd
        .download_data(
            "FAIL",
            Timeframe::D1,
            "2023-01-01",
            "2023-01-31",
            OutputFormat::Records,
            4,
            false,
            5.0,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, QuantdleError::Request { .. }), "got {err:?}");
}

#[tokio::test]
async fn download_data_returns_the_table() {
    let qd = fixture_client();

    let table = qd
        .download_data(
            "XAUUSD",
            Timeframe::D1,
            day(2022, 2, 1),
            day(2022, 2, 28),
            OutputFormat::Records,
            2,
            false,
            5.0,
        )
        .await
        .unwrap();

    assert!(matches!(table, Table::Records(_)));
    assert_eq!(table.len(), 28);
}

#[tokio::test]
async fn duplicate_timestamps_are_kept_unless_asked_otherwise() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_default_window_behavior(MockBehavior::Return(vec![loc("mem://a"), loc("mem://b")]))
        .await;
    let overlap = bar("2023-01-02", "12:00:00", 1.0);
    controller
        .set_archive_behavior(
            loc("mem://a"),
            MockBehavior::Return(vec![bar("2023-01-02", "11:00:00", 1.0), overlap.clone()]),
        )
        .await;
    controller
        .set_archive_behavior(loc("mem://b"), MockBehavior::Return(vec![overlap]))
        .await;
    let qd = client(mock);
    let run = |policy| {
        qd.download()
            .symbol("EURUSD")
            .timeframe(Timeframe::H1)
            .start("2023-01-02")
            .end("2023-01-02")
            .duplicates(policy)
            .run()
    };

    let kept = run(DuplicatePolicy::Keep).await.unwrap();
    assert_eq!(kept.table.len(), 3);
    let deduped = run(DuplicatePolicy::KeepFirst).await.unwrap();
    assert_eq!(deduped.table.len(), 2);
}

#[tokio::test]
async fn progress_is_reported_only_when_enabled() {
    let progress = Arc::new(RecordingProgress::default());
    let qd = Quantdle::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .progress_sink(progress.clone())
        .build()
        .unwrap();

    qd.download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2022-12-31")
        .end("2023-01-01")
        .run()
        .await
        .unwrap();

    assert_eq!(
        progress.events(),
        vec![
            "planned 1".to_string(),
            "window 1/1 2022-12-31 to 2023-01-01".to_string(),
            "location 1/2".to_string(),
            "location 2/2".to_string(),
        ]
    );

    let quiet = Arc::new(RecordingProgress::default());
    let qd = Quantdle::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .progress_sink(quiet.clone())
        .show_progress(false)
        .build()
        .unwrap();
    qd.download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-05")
        .run()
        .await
        .unwrap();
    assert!(quiet.events().is_empty());
}

#[cfg(not(feature = "dataframe"))]
#[tokio::test]
async fn dataframe_output_requires_the_feature() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);

    let err = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-31")
        .output(OutputFormat::DataFrame)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err, QuantdleError::unsupported("output:dataframe"));
    assert!(controller.resolve_calls().await.is_empty());
}

#[cfg(feature = "dataframe")]
#[tokio::test]
async fn dataframe_output_has_the_fixed_schema() {
    let qd = fixture_client();

    let table = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-10")
        .output(OutputFormat::DataFrame)
        .run()
        .await
        .unwrap()
        .table;

    let df = table.into_dataframe().unwrap();
    assert_eq!(df.height(), 10);
    assert_eq!(df.width(), 9);
}
