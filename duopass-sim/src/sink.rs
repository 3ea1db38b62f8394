//! Diagnostic sink routing to `tracing`

use duopass_core::diagnostics::{Diagnostic, DiagnosticSink};
use duopass_core::pass::PassSummary;
use tracing::{info, warn};

/// Logs diagnostics and keeps the pass history for the run report
#[derive(Debug, Default)]
pub struct TracingSink {
    passes: Vec<PassSummary>,
    warnings: usize,
}

impl TracingSink {
    /// Completed passes in order, including aborted ones
    pub fn passes(&self) -> &[PassSummary] {
        &self.passes
    }

    /// Number of warnings emitted
    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if let Diagnostic::PassComplete(summary) | Diagnostic::TravelLimitExceeded(summary) =
            diagnostic
        {
            self.passes.push(summary);
        }

        if diagnostic.is_warning() {
            self.warnings += 1;
            warn!("{diagnostic}");
        } else {
            info!("{diagnostic}");
        }
    }
}
