use quantdle::{OutputFormat, Quantdle, Timeframe};
use quantdle_demos::common::get_connector;

// Run with `--features dataframe` to get a polars DataFrame.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let qd = Quantdle::builder()
        .with_connector(get_connector())
        .show_progress(false)
        .build()?;

    let result = qd
        .download_data(
            "XAUUSD",
            Timeframe::D1,
            "2023-06-01",
            "2023-06-30",
            OutputFormat::DataFrame,
            4,
            false,
            5.0,
        )
        .await;

    match result {
        #[cfg(feature = "dataframe")]
        Ok(table) => {
            if let Some(df) = table.into_dataframe() {
                println!("{:?} ({} rows)", df.get_column_names(), df.height());
            }
        }
        #[cfg(not(feature = "dataframe"))]
        Ok(table) => println!("{} rows", table.len()),
        Err(quantdle::QuantdleError::Unsupported { capability }) => {
            println!("{capability} is not compiled in; rebuild with --features dataframe");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
