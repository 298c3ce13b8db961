use std::sync::Arc;

use quantdle::{DateRange, ProgressSink, Quantdle, Timeframe};
use quantdle_demos::common::get_connector;

/// Prints progress to stdout instead of going through `tracing`.
struct PrintProgress;

impl ProgressSink for PrintProgress {
    fn windows_planned(&self, count: usize) {
        println!("Splitting request into {count} chunk(s)");
    }

    fn window_started(&self, index: usize, count: usize, window: &DateRange) {
        println!("Downloading chunk {}/{count}: {window}", index + 1);
    }

    fn location_finished(&self, completed: usize, total: usize) {
        println!("  archives {completed}/{total}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let qd = Quantdle::builder()
        .with_connector(get_connector())
        .progress_sink(Arc::new(PrintProgress))
        .concurrency(8)
        .build()?;

    // Ten years of daily candles: planned as two windows of at most five years.
    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2014-01-01")
        .end("2023-12-31")
        .max_window_years(5.0)
        .run()
        .await?;

    println!(
        "windows: {}, archives: {}, candles: {}",
        report.windows.len(),
        report.locations,
        report.table.len()
    );
    if let Some((first, last)) = report.table.as_records().and_then(|t| t.time_range()) {
        println!("first: {first}, last: {last}");
    }
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    Ok(())
}
