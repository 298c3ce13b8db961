use quantdle::QuantdleConnector;
use std::sync::Arc;

/// Environment variable that switches every example to the mock connector.
pub const USE_MOCK_ENV: &str = "QUANTDLE_EXAMPLES_USE_MOCK";

/// Return a connector for examples.
///
/// # Panics
/// Panics if `QUANTDLE_API_KEY` / `QUANTDLE_API_KEY_ID` are missing or the
/// configured host is invalid.
#[must_use]
pub fn get_connector() -> Arc<dyn QuantdleConnector> {
    if std::env::var(USE_MOCK_ENV).is_ok() {
        println!("--- (Using Mock Connector for CI) ---");
        Arc::new(quantdle_mock::MockConnector::new())
    } else {
        Arc::new(
            quantdle_http::QuantdleHttp::from_env()
                .expect("set QUANTDLE_API_KEY and QUANTDLE_API_KEY_ID"),
        )
    }
}
