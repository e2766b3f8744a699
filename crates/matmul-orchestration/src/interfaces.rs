//! Orchestration interfaces.

use parking_lot::Mutex;

use matmul_core::error::Result;
use matmul_core::report::Report;

/// Trait for delivering a finished report to a callback URL.
pub trait ReportNotifier: Send + Sync {
    /// Deliver `report` to `url`. Failures are reported, never retried.
    fn notify(&self, url: &str, report: &Report) -> Result<()>;
}

/// Null notifier (does nothing).
pub struct NullNotifier;

impl ReportNotifier for NullNotifier {
    fn notify(&self, _url: &str, _report: &Report) -> Result<()> {
        Ok(())
    }
}

/// Notifier that keeps every delivery in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<(String, Report)>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(url, report)` pairs delivered so far.
    #[must_use]
    pub fn deliveries(&self) -> Vec<(String, Report)> {
        self.deliveries.lock().clone()
    }
}

impl ReportNotifier for RecordingNotifier {
    fn notify(&self, url: &str, report: &Report) -> Result<()> {
        self.deliveries.lock().push((url.to_string(), report.clone()));
        Ok(())
    }
}
