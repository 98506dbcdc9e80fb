//! Error types for stepwise pipelines.
//!
//! Two failure channels are kept apart on purpose:
//!
//! - [`StepError`]: an expected failure reported by a step at run time. The
//!   executor captures it into the request's `errors` and clears `valid`.
//! - [`InvalidPathError`]: a malformed path descriptor. It is returned while a
//!   pipeline is being authored and never travels through a step result.
//!
//! [`AccessError`] is raised by the nested state accessor. It converts into a
//! [`StepError`] so actions can use `?` when they read or write state.

use thiserror::Error;

/// The descriptor grammar, quoted by every [`InvalidPathError`].
pub const PATH_GRAMMAR: &str = "a descriptor names exactly one path: a bare key (\"a\"), \
a key with a terminal key ({\"a\": \"b\"}) or a key with a nested descriptor \
({\"a\": {\"b\": \"c\"}}); address several paths with several descriptors \
([{\"a\": {\"b\": \"c\"}}, {\"a\": {\"b\": \"d\"}}]), never by fanning out under \
one key ({\"a\": {\"b\": [\"c\", \"d\"]}})";

/// A path descriptor that does not follow the descriptor grammar.
///
/// This signals a bug in the code that built the descriptor, not bad data in
/// a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path descriptor {descriptor} ({reason}): {}", PATH_GRAMMAR)]
pub struct InvalidPathError {
    /// The offending descriptor, rendered in its JSON spelling.
    pub descriptor: String,
    /// Which rule the descriptor broke.
    pub reason: String,
}

impl InvalidPathError {
    pub fn new(descriptor: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure while reading or writing nested state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("key `{key}` not found while resolving `{path}`")]
    KeyNotFound { key: String, path: String },

    #[error("value at `{key}` is not a mapping while resolving `{path}`")]
    NotAMapping { key: String, path: String },
}

/// A recoverable failure reported by a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StepError {
    message: String,
}

impl StepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message handed to the step's error handler.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AccessError> for StepError {
    fn from(error: AccessError) -> Self {
        Self::new(error.to_string())
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_error_states_grammar() {
        let error = InvalidPathError::new("[]", "an empty list names no key");
        let display = error.to_string();

        assert!(display.starts_with("invalid path descriptor [] (an empty list names no key)"));
        assert!(display.contains("{\"a\": {\"b\": [\"c\", \"d\"]}}"));
        assert!(display.contains("[{\"a\": {\"b\": \"c\"}}, {\"a\": {\"b\": \"d\"}}]"));
    }

    #[test]
    fn test_access_error_converts_to_step_error() {
        let error = AccessError::KeyNotFound {
            key: "price".into(),
            path: "order.price".into(),
        };

        let step_error = StepError::from(error);
        assert_eq!(
            step_error.message(),
            "key `price` not found while resolving `order.price`"
        );
    }
}
