//! Quantdle-specific data transfer objects, configuration, and error types.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod symbol;
mod timeframe;
mod warning;

pub use capability::Capability;
pub use config::{
    ClientConfig, Credentials, DEFAULT_HOST, DownloadConfig, DuplicatePolicy, OutputFormat,
};
pub use error::QuantdleError;
pub use symbol::SymbolInfo;
pub use timeframe::Timeframe;
pub use warning::Warning;
