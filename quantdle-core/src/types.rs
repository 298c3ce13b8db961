//! Re-export of foundational types from `quantdle-types`.
// Consolidated re-exports so downstream crates can depend on `quantdle-core` only

pub use quantdle_types::{Capability, QuantdleError, Warning};

pub use quantdle_types::{
    ClientConfig, Credentials, DEFAULT_HOST, DownloadConfig, DuplicatePolicy, OutputFormat,
};

pub use quantdle_types::{SymbolInfo, Timeframe};
