use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::helpers::{client, day};
use quantdle_core::connector::WindowResolver;
use quantdle::{
    ArchiveLocation, DateRange, Diagnostics, Quantdle, QuantdleConnector, QuantdleError,
    Timeframe,
};
use quantdle_mock::{DynamicMockConnector, MockConnector};

/// Resolver-only connector that counts how often it is asked.
#[derive(Default)]
struct ResolveOnly {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl WindowResolver for ResolveOnly {
    async fn resolve(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        _window: &DateRange,
        _diag: &mut Diagnostics,
    ) -> Result<Vec<ArchiveLocation>, QuantdleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ArchiveLocation::new("mem://unreachable")])
    }
}

impl QuantdleConnector for ResolveOnly {
    fn name(&self) -> &'static str {
        "resolve-only"
    }

    fn as_window_resolver(&self) -> Option<&dyn WindowResolver> {
        Some(self as &dyn WindowResolver)
    }
}

#[tokio::test]
async fn missing_fetch_role_is_unsupported_before_any_request() {
    let connector = Arc::new(ResolveOnly::default());
    let qd = client(connector.clone());

    let err = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2023-01-01")
        .end("2023-01-31")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, QuantdleError::Unsupported { .. }), "got {err:?}");
    assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn builder_requires_a_connector() {
    let err = Quantdle::builder().build().err().unwrap();
    assert!(matches!(err, QuantdleError::InvalidArg(_)));
}

#[tokio::test]
async fn builder_defaults_match_the_documented_values() {
    let qd = client(Arc::new(MockConnector::new()));
    let cfg = qd.config();
    assert_eq!(cfg.concurrency, 4);
    assert!((cfg.max_window_years - 5.0).abs() < f64::EPSILON);
    assert_eq!(qd.connector_name(), "quantdle-mock");
}

#[tokio::test]
async fn symbol_metadata_passes_through() {
    let qd = client(Arc::new(MockConnector::new()));

    let symbols = qd.list_symbols().await.unwrap();
    assert!(symbols.iter().any(|s| s == "EURUSD"));

    let info = qd.symbol_info("eurusd").await.unwrap();
    assert_eq!(info.symbol, "EURUSD");
    assert_eq!(info.available_from, day(2010, 1, 1));
    assert_eq!(info.available_to, day(2024, 12, 31));
}

#[tokio::test]
async fn symbol_metadata_without_catalog_is_unsupported() {
    let (mock, _controller) = DynamicMockConnector::new_with_controller("dyn");
    let qd = client(mock);

    let err = qd.list_symbols().await.unwrap_err();
    assert_eq!(err, QuantdleError::unsupported("list-symbols (dyn)"));
    let err = qd.symbol_info("EURUSD").await.unwrap_err();
    assert_eq!(err, QuantdleError::unsupported("symbol-info (dyn)"));
}
