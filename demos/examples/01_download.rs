use quantdle::{Quantdle, Timeframe};
use quantdle_demos::common::get_connector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let qd = Quantdle::builder()
        .with_connector(get_connector())
        .show_progress(false)
        .build()?;

    let report = qd
        .download()
        .symbol("EURUSD")
        .timeframe(Timeframe::D1)
        .start("2024-01-01")
        .end("2024-01-31")
        .run()
        .await?;

    for w in &report.warnings {
        eprintln!("warning: {w}");
    }

    let Some(table) = report.table.as_records() else {
        return Ok(());
    };
    println!("{}", table.columns().join("\t"));
    for c in table.iter().take(5) {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            c.datetime,
            fmt_price(c.open),
            fmt_price(c.high),
            fmt_price(c.low),
            fmt_price(c.close),
            fmt_opt(c.volume),
            fmt_opt(c.spread),
            fmt_opt(c.spreadmax),
            fmt_opt(c.spreadopen),
        );
    }
    println!("... {} rows", table.len());
    Ok(())
}

fn fmt_price(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.5}"))
}

fn fmt_opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}
