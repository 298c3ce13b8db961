use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use quantdle::{
    ArchiveLocation, DateRange, ProgressSink, Quantdle, QuantdleConnector, RawRecord,
};
use serde_json::json;

/// Construct a calendar date for readability in tests.
pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Inclusive window between two `(y, m, d)` triples.
pub fn window(a: (i32, u32, u32), b: (i32, u32, u32)) -> DateRange {
    DateRange::new(day(a.0, a.1, a.2), day(b.0, b.1, b.2)).expect("valid range")
}

/// One raw record in the service's archive shape.
pub fn bar(date: &str, time: &str, open: f64) -> RawRecord {
    [
        ("date", json!(date)),
        ("time", json!(time)),
        ("open", json!(open)),
        ("high", json!(open + 0.5)),
        ("low", json!(open - 0.5)),
        ("close", json!(open + 0.25)),
        ("volume", json!(100)),
        ("spread", json!(2)),
        ("spreadmax", json!(4)),
        ("spreadopen", json!(2)),
    ]
    .into_iter()
    .collect()
}

pub fn loc(s: &str) -> ArchiveLocation {
    ArchiveLocation::new(s)
}

/// Orchestrator over `connector` with progress reporting off.
pub fn client(connector: Arc<dyn QuantdleConnector>) -> Quantdle {
    Quantdle::builder()
        .with_connector(connector)
        .show_progress(false)
        .build()
        .unwrap()
}

/// Progress sink that records every event as a short string.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn windows_planned(&self, count: usize) {
        self.events.lock().unwrap().push(format!("planned {count}"));
    }

    fn window_started(&self, index: usize, count: usize, window: &DateRange) {
        self.events
            .lock()
            .unwrap()
            .push(format!("window {}/{count} {window}", index + 1));
    }

    fn location_finished(&self, completed: usize, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("location {completed}/{total}"));
    }
}
