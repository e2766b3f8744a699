//! HTTP report callback.

use std::time::Duration;

use matmul_core::error::{MatMulError, Result};
use matmul_core::report::Report;

use crate::interfaces::ReportNotifier;

/// Default bound on a single callback request.
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs the JSON-serialized report to the callback URL. One attempt only.
pub struct HttpCallbackNotifier {
    agent: ureq::Agent,
}

impl HttpCallbackNotifier {
    /// Create a notifier whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Default for HttpCallbackNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CALLBACK_TIMEOUT)
    }
}

impl ReportNotifier for HttpCallbackNotifier {
    fn notify(&self, url: &str, report: &Report) -> Result<()> {
        let body = serde_json::to_string(report)
            .map_err(|e| MatMulError::Callback(format!("serialize report: {e}")))?;
        tracing::debug!(url, bytes = body.len(), "posting report");

        self.agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| MatMulError::Callback(format!("{url}: {e}")))?;
        Ok(())
    }
}
