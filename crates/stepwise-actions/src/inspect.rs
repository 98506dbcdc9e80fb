//! A pass-through step that logs the request it sees.

use stepwise_core::{Action, Request, StepError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Inspect {
    label: String,
}

/// Log the request at debug level under `label` and pass it on unchanged.
pub fn inspect(label: impl Into<String>) -> Inspect {
    Inspect {
        label: label.into(),
    }
}

impl Action for Inspect {
    fn run(&self, request: Request) -> Result<Request, StepError> {
        debug!(
            label = %self.label,
            valid = request.is_valid(),
            state = ?request.state(),
            "inspecting request"
        );
        Ok(request)
    }
}
