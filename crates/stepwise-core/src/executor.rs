//! Fail-fast execution of a request's steps.
//!
//! The executor folds over the steps in insertion order. Each step receives
//! the request produced by the one before it. The first step to fail ends the
//! run: its error handler's value becomes the only entry in `errors`, `valid`
//! turns false, and no later step runs.

use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::request::Request;

/// Run every step of `request`, halting at the first failure.
///
/// The steps executed are those present when the run starts. A request that
/// has already failed is returned as is.
///
/// Each step runs on a copy of the request so the failed result can carry
/// the state the failing step received. That copy is a deep clone of the
/// state, so a run costs O(steps × state size).
pub fn fail_fast(request: Request) -> Request {
    if !request.is_valid() {
        debug!("request already failed, skipping run");
        return request;
    }

    let steps = request.steps().to_vec();
    let total = steps.len();

    let flow = steps
        .iter()
        .enumerate()
        .try_fold(request, |current, (index, step)| {
            debug!(step = index + 1, total, "running step");
            match step.run(current.clone()) {
                Ok(next) => ControlFlow::Continue(next),
                Err(error) => {
                    warn!(
                        step = index + 1,
                        total,
                        error = %error,
                        "step failed, halting pipeline"
                    );
                    ControlFlow::Break(current.fail(step.report(error.message())))
                }
            }
        });

    match flow {
        ControlFlow::Continue(done) => {
            debug!(total, "pipeline succeeded");
            done
        }
        ControlFlow::Break(failed) => failed,
    }
}

/// Dispatch on validity: exactly one of the two continuations is called.
pub fn unwrap<T, S, F>(request: Request, on_success: S, on_failure: F) -> T
where
    S: FnOnce(Request) -> T,
    F: FnOnce(Request) -> T,
{
    if request.is_valid() {
        on_success(request)
    } else {
        on_failure(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::State;
    use crate::error::StepError;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn set(key: &'static str, value: i64) -> impl Fn(Request) -> Result<Request, StepError> {
        move |request: Request| {
            let mut partial = State::new();
            partial.insert(key.to_string(), json!(value));
            request.merge_state(partial)
        }
    }

    fn refuse(message: &'static str) -> impl Fn(Request) -> Result<Request, StepError> {
        move |_: Request| Err(StepError::new(message))
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let request = Request::default();
        let before = request.clone().into_outcome();

        let after = fail_fast(request);
        assert_eq!(after.clone().into_outcome(), before);
        assert!(after.steps().is_empty());
    }

    #[test]
    fn test_steps_thread_the_request() {
        let result = fail_fast(Request::default().add_step(set("a", 1)).add_step(set("b", 2)));

        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert_eq!(Value::Object(result.into_state()), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_first_failure_halts() {
        let result = fail_fast(
            Request::default()
                .add_step(set("a", 1))
                .add_step(refuse("nope"))
                .add_step(set("b", 2)),
        );

        assert!(!result.is_valid());
        assert_eq!(result.errors(), &[json!("nope")]);
        // State is the one the failing step received.
        assert_eq!(Value::Object(result.into_state()), json!({"a": 1}));
    }

    #[test]
    fn test_failing_step_discards_its_own_writes() {
        let write_then_refuse = |request: Request| -> Result<Request, StepError> {
            let mut partial = State::new();
            partial.insert("half".to_string(), json!(true));
            request.merge_state(partial)?;
            Err(StepError::new("gave up"))
        };

        let result = fail_fast(
            Request::default()
                .add_step(set("a", 1))
                .add_step(write_then_refuse),
        );

        assert_eq!(result.errors(), &[json!("gave up")]);
        assert_eq!(Value::Object(result.into_state()), json!({"a": 1}));
    }

    #[test]
    fn test_failed_request_is_not_rerun() {
        let failed = fail_fast(Request::default().add_step(refuse("first")));
        let rerun = fail_fast(failed.add_step(set("a", 1)));

        assert_eq!(rerun.errors(), &[json!("first")]);
        assert!(rerun.state().is_empty());
    }

    #[test]
    fn test_unwrap_dispatch() {
        let ok = unwrap(Request::default(), |_| "success", |_| "failure");
        assert_eq!(ok, "success");

        let failed = fail_fast(Request::default().add_step(refuse("nope")));
        let err = unwrap(failed, |_| "success", |_| "failure");
        assert_eq!(err, "failure");
    }
}
