//! Validations that check the value found at each of a list of paths.
//!
//! Every check follows the same pattern: normalize the descriptors when the
//! pipeline is built, then at run time read each path in order and fail on
//! the first value the predicate rejects. The failure message names the last
//! key of the failing path.
//!
//! Values are checked as they are, with no coercion between types. In
//! particular [`not_negative_at`] only constrains numbers: any other value
//! sorts after every number and therefore passes.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use stepwise_core::{
    normalize_all, InvalidPathError, KeyPath, PathDescriptor, Request, StepError, Validation,
};
use uuid::Uuid;

/// A predicate applied to the value at every path.
pub struct KeyCheck<P, M> {
    paths: Vec<KeyPath>,
    predicate: P,
    message: M,
}

impl<P, M> KeyCheck<P, M> {
    pub fn paths(&self) -> &[KeyPath] {
        &self.paths
    }
}

/// Build a check from a predicate and a message template.
///
/// `message` receives the last key of the failing path.
pub fn check_at<I, D, P, M>(
    paths: I,
    predicate: P,
    message: M,
) -> Result<KeyCheck<P, M>, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
    P: Fn(&Value) -> bool + Send + Sync,
    M: Fn(&str) -> String + Send + Sync,
{
    Ok(KeyCheck {
        paths: normalize_all(paths)?,
        predicate,
        message,
    })
}

impl<P, M> Validation for KeyCheck<P, M>
where
    P: Fn(&Value) -> bool + Send + Sync,
    M: Fn(&str) -> String + Send + Sync,
{
    fn validate(&self, request: &Request) -> Result<(), StepError> {
        for path in &self.paths {
            let value = request.get(path)?;
            if !(self.predicate)(value) {
                return Err(StepError::new((self.message)(path.last())));
            }
        }
        Ok(())
    }
}

/// Predicate shape used by the standard checks.
pub type Predicate = fn(&Value) -> bool;
/// Message template shape used by the standard checks.
pub type Message = fn(&str) -> String;

/// A check built from one of the predicates in this module.
pub type StandardCheck = KeyCheck<Predicate, Message>;

/// Values must be present and not `null`.
pub fn not_nil_at<I, D>(paths: I) -> Result<StandardCheck, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
{
    check_at(
        paths,
        is_present as Predicate,
        (|key: &str| format!("{} must not be nil.", key)) as Message,
    )
}

/// Numbers must be zero or greater.
pub fn not_negative_at<I, D>(paths: I) -> Result<StandardCheck, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
{
    check_at(
        paths,
        is_not_negative as Predicate,
        (|key: &str| format!("{} must not be negative.", key)) as Message,
    )
}

/// Values must be ISO-8601 calendar dates (`YYYY-MM-DD`).
pub fn date_is_a_date_at<I, D>(paths: I) -> Result<StandardCheck, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
{
    check_at(
        paths,
        is_date as Predicate,
        (|key: &str| format!("{} is not a valid date.", key)) as Message,
    )
}

/// Values must look like a primary key: a positive integer, a string of
/// digits without a leading zero, or a UUID string.
pub fn id_looks_right_at<I, D>(paths: I) -> Result<StandardCheck, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
{
    check_at(
        paths,
        looks_like_id as Predicate,
        (|key: &str| format!("{} does not look like a valid id.", key)) as Message,
    )
}

fn is_present(value: &Value) -> bool {
    !value.is_null()
}

fn is_not_negative(value: &Value) -> bool {
    match value {
        Value::Number(number) => !is_negative(&number.to_string()),
        _ => true,
    }
}

// Numbers keep their written text, which may lie outside f64 range or
// precision, so the sign is read from the text: negative means a leading `-`
// and a nonzero digit in the mantissa.
fn is_negative(text: &str) -> bool {
    text.strip_prefix('-').is_some_and(|magnitude| {
        magnitude
            .split(|c| c == 'e' || c == 'E')
            .next()
            .is_some_and(|mantissa| mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')))
    })
}

fn is_date(value: &Value) -> bool {
    match value {
        Value::String(text) => text.parse::<NaiveDate>().is_ok(),
        _ => false,
    }
}

fn looks_like_id(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_u64().is_some_and(|id| id > 0),
        Value::String(text) => is_integer_id(text) || Uuid::parse_str(text).is_ok(),
        _ => false,
    }
}

const INTEGER_ID_PATTERN: &str = r"^[1-9][0-9]*$";

fn is_integer_id(text: &str) -> bool {
    Regex::new(INTEGER_ID_PATTERN).is_ok_and(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_is_not_negative() {
        assert!(is_not_negative(&json!(0)));
        assert!(is_not_negative(&json!(3.5)));
        assert!(is_not_negative(&json!(-0.0)));
        assert!(!is_not_negative(&json!(-1)));
        assert!(!is_not_negative(&json!(-0.01)));
        assert!(is_not_negative(&number("-0e10")));
        // beyond f64 range and precision
        assert!(!is_not_negative(&number("-1e400")));
        assert!(!is_not_negative(&number("-1e-400")));
        assert!(!is_not_negative(&number("-0.000000000000000000000000000001")));
        assert!(is_not_negative(&number("1e400")));
        // no coercion: non-numbers sort after numbers
        assert!(is_not_negative(&json!("-5")));
        assert!(is_not_negative(&json!(null)));
    }

    #[test]
    fn test_is_date() {
        assert!(is_date(&json!("2024-02-29")));
        assert!(!is_date(&json!("2023-02-29")));
        assert!(!is_date(&json!("29/02/2024")));
        assert!(!is_date(&json!(20240229)));
    }

    #[test]
    fn test_looks_like_id() {
        assert!(looks_like_id(&json!(42)));
        assert!(looks_like_id(&json!("42")));
        assert!(looks_like_id(&json!("67e55044-10b1-426f-9247-bb680e5fe0c8")));
        assert!(!looks_like_id(&json!(0)));
        assert!(!looks_like_id(&json!(-3)));
        assert!(!looks_like_id(&json!(1.5)));
        assert!(!looks_like_id(&json!("042")));
        assert!(!looks_like_id(&json!("abc")));
        assert!(!looks_like_id(&json!("")));
        assert!(!looks_like_id(&json!("12a")));
        assert!(!looks_like_id(&json!("12\n")));
        assert!(!looks_like_id(&json!(null)));
    }

    #[test]
    fn test_is_present() {
        assert!(is_present(&json!(false)));
        assert!(is_present(&json!("")));
        assert!(!is_present(&json!(null)));
    }
}
