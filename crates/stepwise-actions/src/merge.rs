//! Actions that merge values into a request's state.
//!
//! Merging is shallow: top-level keys of the merged value replace the keys
//! already in state, nested mappings are not combined.

use serde_json::Value;
use stepwise_core::{Action, Key, Request, State, StepError};

/// Merge a fixed partial state. Always succeeds.
#[derive(Debug, Clone)]
pub struct Merge {
    partial: State,
}

pub fn merge(partial: State) -> Merge {
    Merge { partial }
}

impl Action for Merge {
    fn run(&self, request: Request) -> Result<Request, StepError> {
        request.merge_state(self.partial.clone())
    }
}

/// Compute a value from state and merge it under `key`.
///
/// A failure from the computation is the step's failure.
pub struct MergeComputed<F> {
    key: Key,
    compute: F,
}

pub fn merge_computed<F>(key: impl Into<Key>, compute: F) -> MergeComputed<F>
where
    F: Fn(&State) -> Result<Value, StepError> + Send + Sync,
{
    MergeComputed {
        key: key.into(),
        compute,
    }
}

impl<F> Action for MergeComputed<F>
where
    F: Fn(&State) -> Result<Value, StepError> + Send + Sync,
{
    fn run(&self, request: Request) -> Result<Request, StepError> {
        let value = (self.compute)(request.state())?;
        let mut partial = State::new();
        partial.insert(self.key.clone(), value);
        request.merge_state(partial)
    }
}
