//! Write-only status output of the hub.

use sonar_core::Snapshot;
use sonar_edge::Diagnostic;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("display initialization failed: {0}")]
    InitFailed(String),
}

/// Receives periodic snapshots and diagnostic events. Nothing flows back.
pub trait DisplaySink: Send {
    /// Prepare the output. A failure here aborts startup.
    fn init(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn show(&mut self, snapshot: &Snapshot);

    fn diagnostic(&mut self, diagnostic: &Diagnostic);
}

/// Renders the status through the log.
#[derive(Debug, Default)]
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn show(&mut self, snapshot: &Snapshot) {
        info!(target: "sonar_hub::display", "{snapshot}");
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        warn!(target: "sonar_hub::display", "{diagnostic}");
    }
}
