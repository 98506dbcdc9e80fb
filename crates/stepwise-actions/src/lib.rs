//! Stepwise Actions
//!
//! Reusable steps for [`stepwise_core`] pipelines:
//!
//! - **Merging**: [`merge`] and [`merge_computed`]
//! - **Parsing**: [`parse_decimal_at`] rewrites values in place as decimals
//! - **Checks**: [`not_nil_at`], [`not_negative_at`], [`date_is_a_date_at`],
//!   [`id_looks_right_at`] and the generic [`check_at`]
//! - **Inspection**: [`inspect`] logs the request without changing it
//!
//! Constructors that take path descriptors normalize them immediately and
//! return [`InvalidPathError`](stepwise_core::InvalidPathError) for malformed
//! ones, so path bugs surface while the pipeline is built.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stepwise_actions::{not_negative_at, parse_decimal_at};
//! use stepwise_core::{PathDescriptor, Request};
//!
//! let state = json!({"order": {"price": "1.20"}}).as_object().cloned().unwrap_or_default();
//! let price = PathDescriptor::pair("order", "price");
//!
//! let request = Request::with_state(state)
//!     .add_step(parse_decimal_at([price.clone()])?)
//!     .add_validation(not_negative_at([price])?)
//!     .run();
//!
//! assert!(request.is_valid());
//! assert_eq!(request.state()["order"]["price"].to_string(), "1.20");
//! # Ok::<(), stepwise_core::InvalidPathError>(())
//! ```

mod checks;
mod decimal;
mod inspect;
mod merge;

pub use checks::{
    check_at, date_is_a_date_at, id_looks_right_at, not_negative_at, not_nil_at, KeyCheck,
    Message, Predicate, StandardCheck,
};
pub use decimal::{parse_decimal_at, ParseDecimal};
pub use inspect::{inspect, Inspect};
pub use merge::{merge, merge_computed, Merge, MergeComputed};
