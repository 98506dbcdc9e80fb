//! The request: the value threaded through a pipeline.
//!
//! A request carries the working `state`, the ordered `steps` to run, the
//! `errors` reported so far and a validity flag. Every operation takes the
//! request by value and returns a new one, so a failed run never leaves a
//! half-updated request behind and several runs can start from the same
//! initial value.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::{NestedAccess, State};
use crate::error::{AccessError, StepError};
use crate::executor;
use crate::path::KeyPath;
use crate::step::{
    default_error_handler, Action, ErrorHandler, Step, StepOptions, Validated, Validation,
};

/// One in-flight unit of work.
///
/// `valid` is true exactly when `errors` is empty.
#[derive(Clone)]
pub struct Request {
    state: State,
    steps: Vec<Step>,
    errors: Vec<Value>,
    valid: bool,
    on_error: ErrorHandler,
}

impl Request {
    /// A valid request with no steps, reporting failures through `on_error`.
    pub fn new<F>(state: State, on_error: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Self::with_handler(state, Arc::new(on_error))
    }

    /// A valid request using [`default_error_handler`].
    pub fn with_state(state: State) -> Self {
        Self::with_handler(state, default_error_handler())
    }

    fn with_handler(state: State, on_error: ErrorHandler) -> Self {
        Self {
            state,
            steps: Vec::new(),
            errors: Vec::new(),
            valid: true,
            on_error,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn errors(&self) -> &[Value] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Replace the default error handler.
    ///
    /// Only steps added after this call pick up the new handler.
    pub fn set_on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.on_error = Arc::new(on_error);
        self
    }

    /// Append a step that uses the current default error handler.
    pub fn add_step<A>(self, action: A) -> Self
    where
        A: Action + 'static,
    {
        self.add_step_with(action, StepOptions::default())
    }

    /// Append a step, letting `options` override its error handler.
    pub fn add_step_with<A>(mut self, action: A, options: StepOptions) -> Self
    where
        A: Action + 'static,
    {
        let on_error = options
            .on_error
            .unwrap_or_else(|| Arc::clone(&self.on_error));
        self.steps.push(Step::new(Arc::new(action), on_error));
        self
    }

    /// Append a validation. It runs like any step but hands the request on
    /// unchanged when it passes.
    pub fn add_validation<V>(self, validation: V) -> Self
    where
        V: Validation + 'static,
    {
        self.add_step(Validated(validation))
    }

    pub fn add_validation_with<V>(self, validation: V, options: StepOptions) -> Self
    where
        V: Validation + 'static,
    {
        self.add_step_with(Validated(validation), options)
    }

    /// Shallow union of the current state and `partial`; keys in `partial`
    /// win. Never fails, but returns a `Result` so it can serve as an action.
    pub fn merge_state(mut self, partial: State) -> Result<Self, StepError> {
        let mut state = std::mem::take(&mut self.state);
        state.extend(partial);
        self.state = state;
        Ok(self)
    }

    /// Read the value at `path` inside state.
    pub fn get(&self, path: &KeyPath) -> Result<&Value, AccessError> {
        self.state.get_path(path)
    }

    /// Return a request whose state holds `value` at `path`.
    pub fn put(mut self, path: &KeyPath, value: Value) -> Result<Self, AccessError> {
        let state = std::mem::take(&mut self.state);
        self.state = state.set_path(path, value)?;
        Ok(self)
    }

    /// Run all steps fail-fast. See [`executor::fail_fast`].
    pub fn run(self) -> Self {
        executor::fail_fast(self)
    }

    /// Hand the request to `on_success` when valid, otherwise to `on_failure`.
    pub fn unwrap<T, S, F>(self, on_success: S, on_failure: F) -> T
    where
        S: FnOnce(Request) -> T,
        F: FnOnce(Request) -> T,
    {
        executor::unwrap(self, on_success, on_failure)
    }

    /// The serializable result of a run.
    pub fn into_outcome(self) -> Outcome {
        Outcome {
            valid: self.valid,
            state: self.state,
            errors: self.errors,
        }
    }

    /// Mark the request failed with a single reported error, replacing any
    /// earlier ones.
    pub(crate) fn fail(mut self, reported: Value) -> Self {
        self.valid = false;
        self.errors = vec![reported];
        self
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::with_state(State::new())
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("state", &self.state)
            .field("steps", &self.steps.len())
            .field("errors", &self.errors)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

/// What a caller sees once a pipeline has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub valid: bool,
    pub state: State,
    pub errors: Vec<Value>,
}
