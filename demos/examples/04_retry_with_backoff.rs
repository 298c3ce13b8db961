use std::future::Future;
use std::time::Duration;

use quantdle::{DownloadReport, Quantdle, QuantdleError, Timeframe};
use quantdle_demos::common::get_connector;
use rand::Rng;

/// Retry `op` on transport-level failures with exponential backoff and jitter.
///
/// Authentication, argument, and range errors are returned immediately.
async fn with_backoff<F, Fut>(
    max_attempts: u32,
    base: Duration,
    mut op: F,
) -> Result<DownloadReport, QuantdleError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DownloadReport, QuantdleError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(report) => return Ok(report),
            Err(e @ QuantdleError::Request { .. }) if attempt < max_attempts => {
                let backoff = base * 2u32.pow(attempt - 1);
                let max_jitter = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX) / 2;
                let jitter_ms = rand::rng().random_range(0..=max_jitter);
                let delay = backoff + Duration::from_millis(jitter_ms);
                eprintln!("attempt {attempt} failed ({e}); retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let qd = Quantdle::builder()
        .with_connector(get_connector())
        .show_progress(false)
        .build()?;

    let download = |symbol: &'static str| {
        qd.download()
            .symbol(symbol)
            .timeframe(Timeframe::H4)
            .start("2024-03-01")
            .end("2024-03-31")
            .run()
    };

    let report = with_backoff(4, Duration::from_millis(200), || download("GBPUSD")).await?;
    println!("GBPUSD: {} candles", report.table.len());

    // The mock fails this symbol on every attempt; the last error is returned.
    match with_backoff(3, Duration::from_millis(10), || download("FAIL")).await {
        Ok(report) => println!("FAIL: {} candles", report.table.len()),
        Err(e) => println!("FAIL gave up: {e}"),
    }
    Ok(())
}
