use chrono::Days;
use quantdle::{Quantdle, Timeframe};
use quantdle_demos::common::get_connector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let qd = Quantdle::builder()
        .with_connector(get_connector())
        .show_progress(false)
        .build()?;

    let symbols = qd.list_symbols().await?;
    println!("{} symbols available", symbols.len());

    for symbol in symbols.iter().take(3) {
        let info = qd.symbol_info(symbol).await?;
        println!(
            "{}: {} to {}",
            info.symbol, info.available_from, info.available_to
        );

        // Last two weeks of available data.
        let start = info
            .available_to
            .checked_sub_days(Days::new(13))
            .unwrap_or(info.available_from)
            .max(info.available_from);
        let report = qd
            .download()
            .symbol(info.symbol.as_str())
            .timeframe(Timeframe::D1)
            .start(start)
            .end(info.available_to)
            .run()
            .await?;
        println!("  {} recent daily candles", report.table.len());
    }
    Ok(())
}
