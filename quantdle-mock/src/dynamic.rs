use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quantdle_core::connector::{ArchiveFetcher, QuantdleConnector, WindowResolver};
use quantdle_core::{
    ArchiveLocation, DateRange, Diagnostics, QuantdleError, RawRecord, Timeframe, Warning,
};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Record the warning and return an empty value.
    Warn(Warning),
    /// Fail immediately with the provided error.
    Fail(QuantdleError),
    /// Hang indefinitely (simulate a stalled request).
    Hang,
}

#[derive(Default)]
struct InternalState {
    window_rules: HashMap<DateRange, MockBehavior<Vec<ArchiveLocation>>>,
    default_window: Option<MockBehavior<Vec<ArchiveLocation>>>,
    archive_rules: HashMap<ArchiveLocation, MockBehavior<Vec<RawRecord>>>,
    fetch_delay: Option<Duration>,
    resolve_calls: Vec<(String, Timeframe, DateRange)>,
    fetch_calls: Vec<ArchiveLocation>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<InternalState>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    shared: Arc<Shared>,
}

impl DynamicMockController {
    /// Set the behavior for `resolve` calls for one exact window.
    pub async fn set_window_behavior(
        &self,
        window: DateRange,
        behavior: MockBehavior<Vec<ArchiveLocation>>,
    ) {
        let mut guard = self.shared.state.lock().await;
        guard.window_rules.insert(window, behavior);
    }

    /// Set the behavior for `resolve` calls whose window has no specific rule.
    ///
    /// Without a default, unmatched windows resolve to zero locations.
    pub async fn set_default_window_behavior(&self, behavior: MockBehavior<Vec<ArchiveLocation>>) {
        let mut guard = self.shared.state.lock().await;
        guard.default_window = Some(behavior);
    }

    /// Set the behavior for `fetch` calls for a specific location.
    pub async fn set_archive_behavior(
        &self,
        location: ArchiveLocation,
        behavior: MockBehavior<Vec<RawRecord>>,
    ) {
        let mut guard = self.shared.state.lock().await;
        guard.archive_rules.insert(location, behavior);
    }

    /// Delay every fetch by `delay` (useful to observe concurrency).
    pub async fn set_fetch_delay(&self, delay: Duration) {
        let mut guard = self.shared.state.lock().await;
        guard.fetch_delay = Some(delay);
    }

    /// Windows passed to `resolve`, in call order.
    pub async fn resolve_calls(&self) -> Vec<(String, Timeframe, DateRange)> {
        self.shared.state.lock().await.resolve_calls.clone()
    }

    /// Locations passed to `fetch`, in call order.
    pub async fn fetch_calls(&self) -> Vec<ArchiveLocation> {
        self.shared.state.lock().await.fetch_calls.clone()
    }

    /// Highest number of fetches observed in flight at the same time.
    #[must_use]
    pub fn max_concurrent_fetches(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.shared.state.lock().await;
        *guard = InternalState::default();
        self.shared.max_in_flight.store(0, Ordering::SeqCst);
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    shared: Arc<Shared>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn QuantdleConnector>, DynamicMockController) {
        let shared = Arc::new(Shared::default());
        let controller = DynamicMockController {
            shared: Arc::clone(&shared),
        };
        let me = Arc::new(Self { name, shared });
        (me as Arc<dyn QuantdleConnector>, controller)
    }
}

/// Decrements the in-flight counter even if the fetch future is dropped.
struct InFlight<'a>(&'a Shared);

impl<'a> InFlight<'a> {
    fn enter(shared: &'a Shared) -> Self {
        let now = shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        shared.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(shared)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuantdleConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_window_resolver(&self) -> Option<&dyn WindowResolver> {
        Some(self as &dyn WindowResolver)
    }

    fn as_archive_fetcher(&self) -> Option<&dyn ArchiveFetcher> {
        Some(self as &dyn ArchiveFetcher)
    }
}

#[async_trait]
impl WindowResolver for DynamicMockConnector {
    async fn resolve(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        window: &DateRange,
        diag: &mut Diagnostics,
    ) -> Result<Vec<ArchiveLocation>, QuantdleError> {
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.shared.state.lock().await;
            guard
                .resolve_calls
                .push((symbol.to_string(), timeframe, *window));
            guard
                .window_rules
                .get(window)
                .or(guard.default_window.as_ref())
                .cloned()
        };

        match behavior {
            Some(MockBehavior::Return(locations)) => Ok(locations),
            Some(MockBehavior::Warn(w)) => {
                diag.warn(w);
                Ok(Vec::new())
            }
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ArchiveFetcher for DynamicMockConnector {
    async fn fetch(
        &self,
        location: &ArchiveLocation,
        diag: &mut Diagnostics,
    ) -> Result<Vec<RawRecord>, QuantdleError> {
        let _in_flight = InFlight::enter(&self.shared);
        let (behavior, delay) = {
            let mut guard = self.shared.state.lock().await;
            guard.fetch_calls.push(location.clone());
            (guard.archive_rules.get(location).cloned(), guard.fetch_delay)
        };
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        match behavior {
            Some(MockBehavior::Return(records)) => Ok(records),
            Some(MockBehavior::Warn(w)) => {
                diag.warn(w);
                Ok(Vec::new())
            }
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(QuantdleError::extract(
                location.as_str(),
                "no fixture configured for location",
            )),
        }
    }
}
