//! Stepwise Core
//!
//! Fail-fast pipelines over an immutable request value:
//!
//! - **Paths**: [`PathDescriptor`] and its canonical [`KeyPath`] form
//! - **Access**: reading and writing nested state through a [`KeyPath`]
//! - **Requests and steps**: the value threaded through a pipeline
//! - **Executor**: runs steps in order and stops at the first failure
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stepwise_core::{Request, State, StepError};
//!
//! fn total(request: Request) -> Result<Request, StepError> {
//!     let mut partial = State::new();
//!     partial.insert("total".into(), json!(3));
//!     request.merge_state(partial)
//! }
//!
//! let summary = Request::default()
//!     .add_step(total)
//!     .run()
//!     .unwrap(|ok| ok.state()["total"].clone(), |failed| failed.errors()[0].clone());
//!
//! assert_eq!(summary, json!(3));
//! ```

pub mod access;
pub mod error;
pub mod executor;
pub mod path;
pub mod request;
pub mod step;

pub use access::{NestedAccess, State};
pub use error::{AccessError, InvalidPathError, StepError, PATH_GRAMMAR};
pub use executor::fail_fast;
pub use path::{normalize, normalize_all, Key, KeyPath, PathDescriptor};
pub use request::{Outcome, Request};
pub use step::{default_error_handler, Action, ErrorHandler, Step, StepOptions, Validation};
