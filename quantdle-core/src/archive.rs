use core::fmt;
use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use zip::ZipArchive;

use crate::diagnostics::Diagnostics;
use crate::record::RawRecord;
use crate::{QuantdleError, Warning};

/// Opaque, time-limited reference (a presigned URL) to one compressed archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveLocation(String);

impl ArchiveLocation {
    /// Wrap a URL returned by the service.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArchiveLocation {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for ArchiveLocation {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

/// Shape of one JSON entry inside an archive, resolved once at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchivePayload {
    /// A top-level array of records.
    Flat(Vec<RawRecord>),
    /// An object carrying the record array under `data`.
    Wrapped(Vec<RawRecord>),
    /// Anything else.
    Unrecognized,
}

impl ArchivePayload {
    /// Classify a parsed JSON document.
    #[must_use]
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => records(items).map_or(Self::Unrecognized, Self::Flat),
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => {
                    records(items).map_or(Self::Unrecognized, Self::Wrapped)
                }
                _ => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }

    /// Records carried by the entry, or `None` when unrecognized.
    #[must_use]
    pub fn into_records(self) -> Option<Vec<RawRecord>> {
        match self {
            Self::Flat(r) | Self::Wrapped(r) => Some(r),
            Self::Unrecognized => None,
        }
    }
}

fn records(items: Vec<Value>) -> Option<Vec<RawRecord>> {
    items
        .into_iter()
        .map(|v| match v {
            Value::Object(map) => Some(RawRecord::from(map)),
            _ => None,
        })
        .collect()
}

/// Whether an archive entry name denotes a JSON data file.
#[must_use]
pub fn is_data_entry(name: &str) -> bool {
    !name.ends_with('/')
        && name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("json"))
}

/// Extract every record from the zip archive in `bytes`.
///
/// Entries are visited in archive order. Only `.json` files are read; an
/// entry whose document is neither a record array nor a `data`-wrapped array
/// is skipped with a [`Warning::MalformedEntry`]. An archive without any
/// `.json` entry yields no records and a [`Warning::NoEligibleEntries`].
///
/// # Errors
/// Returns `Extract` if the bytes are not a readable zip archive, an entry
/// cannot be decompressed, or an eligible entry is not valid JSON.
pub fn extract_archive(
    location: &ArchiveLocation,
    bytes: &[u8],
    diag: &mut Diagnostics,
) -> Result<Vec<RawRecord>, QuantdleError> {
    let fail = |msg: String| QuantdleError::extract(location.as_str(), msg);

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| fail(format!("invalid archive: {e}")))?;

    let mut eligible = 0usize;
    let mut out = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| fail(format!("unreadable entry #{index}: {e}")))?;
        if entry.is_dir() || !is_data_entry(entry.name()) {
            continue;
        }
        eligible += 1;
        let name = entry.name().to_string();

        let mut buf = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut buf)
            .map_err(|e| fail(format!("failed to decompress {name}: {e}")))?;
        let doc: Value = serde_json::from_slice(&buf)
            .map_err(|e| fail(format!("invalid JSON in {name}: {e}")))?;

        match ArchivePayload::classify(doc).into_records() {
            Some(records) => out.extend(records),
            None => diag.warn(Warning::MalformedEntry {
                location: location.to_string(),
                entry: name,
            }),
        }
    }

    if eligible == 0 {
        diag.warn(Warning::NoEligibleEntries {
            location: location.to_string(),
        });
    }
    Ok(out)
}
