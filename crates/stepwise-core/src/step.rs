//! Steps: one unit of pipeline work plus the handler that reports its failure.
//!
//! A step wraps either an [`Action`], which returns a new request, or a
//! [`Validation`], which only inspects one. Both are implemented for plain
//! closures of the right shape:
//!
//! ```rust
//! use stepwise_core::{Request, StepError};
//!
//! let request = Request::default()
//!     .add_step(|request: Request| request.merge_state(Default::default()))
//!     .add_validation(|request: &Request| {
//!         if request.state().is_empty() {
//!             Err(StepError::new("state must not be empty"))
//!         } else {
//!             Ok(())
//!         }
//!     });
//! assert_eq!(request.steps().len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::StepError;
use crate::request::Request;

/// Turns a step's failure message into the value recorded in `errors`.
pub type ErrorHandler = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// The handler used when a request is built without one: the message itself,
/// as a JSON string.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|message: &str| Value::String(message.to_string()))
}

/// Work that receives a request and returns the next one.
pub trait Action: Send + Sync {
    fn run(&self, request: Request) -> Result<Request, StepError>;
}

impl<F> Action for F
where
    F: Fn(Request) -> Result<Request, StepError> + Send + Sync,
{
    fn run(&self, request: Request) -> Result<Request, StepError> {
        self(request)
    }
}

/// A check over a request. It borrows the request, so it cannot alter state.
pub trait Validation: Send + Sync {
    fn validate(&self, request: &Request) -> Result<(), StepError>;
}

impl<F> Validation for F
where
    F: Fn(&Request) -> Result<(), StepError> + Send + Sync,
{
    fn validate(&self, request: &Request) -> Result<(), StepError> {
        self(request)
    }
}

/// Runs a validation and hands the request back untouched.
pub(crate) struct Validated<V>(pub(crate) V);

impl<V: Validation> Action for Validated<V> {
    fn run(&self, request: Request) -> Result<Request, StepError> {
        self.0.validate(&request)?;
        Ok(request)
    }
}

/// Per-step configuration accepted by [`Request::add_step_with`].
#[derive(Clone, Default)]
pub struct StepOptions {
    pub(crate) on_error: Option<ErrorHandler>,
}

impl StepOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report this step's failures with `handler` instead of the request's
    /// default.
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for StepOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepOptions")
            .field("on_error", &self.on_error.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// One unit of pipeline work.
///
/// The error handler is fixed when the step is added to a request; changing
/// the request's default afterwards does not reach existing steps.
#[derive(Clone)]
pub struct Step {
    action: Arc<dyn Action>,
    on_error: ErrorHandler,
}

impl Step {
    pub(crate) fn new(action: Arc<dyn Action>, on_error: ErrorHandler) -> Self {
        Self { action, on_error }
    }

    pub fn run(&self, request: Request) -> Result<Request, StepError> {
        self.action.run(request)
    }

    /// Apply this step's error handler to a failure message.
    pub fn report(&self, message: &str) -> Value {
        (self.on_error)(message)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_handler_reports_message() {
        let handler = default_error_handler();
        assert_eq!(handler("boom"), json!("boom"));
    }

    #[test]
    fn test_step_options_override() {
        let options = StepOptions::new().on_error(|message: &str| json!({"step": message}));
        let handler = options.on_error.expect("handler set");
        assert_eq!(handler("boom"), json!({"step": "boom"}));
    }

    #[test]
    fn test_validated_returns_request_unchanged() {
        let check = Validated(|request: &Request| {
            if request.state().contains_key("id") {
                Ok(())
            } else {
                Err(StepError::new("id is required"))
            }
        });

        let request = Request::default();
        let error = check.run(request).unwrap_err();
        assert_eq!(error.message(), "id is required");
    }
}
