use quantdle::{Quantdle, Timeframe};
use quantdle_demos::common::get_connector;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,quantdle=trace,quantdle_http=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Create connector (mock in CI when QUANTDLE_EXAMPLES_USE_MOCK is set) and build the client.
    // Progress events go through `LogProgress` and show up under the quantdle::progress target.
    let qd = Quantdle::builder().with_connector(get_connector()).build()?;

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::H1)
        .start("2023-11-28")
        .end("2024-01-05")
        .run()
        .await?;

    // Unknown symbols degrade to warnings, which are also logged at WARN.
    let _ = qd
        .download()
        .symbol("NOPE")
        .timeframe(Timeframe::D1)
        .start("2024-01-01")
        .end("2024-01-31")
        .run()
        .await?;

    println!(
        "{} candles across {} window(s)",
        report.table.len(),
        report.windows.len()
    );
    Ok(())
}
