//! Parse values at given paths as decimals and store them back in place.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Number, Value};
use stepwise_core::{
    normalize_all, Action, InvalidPathError, KeyPath, PathDescriptor, Request, StepError,
};

/// Action built by [`parse_decimal_at`].
#[derive(Debug, Clone)]
pub struct ParseDecimal {
    paths: Vec<KeyPath>,
}

/// Parse the value at each path as a decimal, in order.
///
/// Strings are parsed in plain or scientific notation, with an optional
/// leading `+` or `-`; digit separators such as `1_000` are rejected. Numbers
/// are kept as they are. The first value that cannot be parsed fails the step with
/// `"<last key> could not be parsed as a number."`. The parsed number keeps
/// the scale it was written with, so `"1.20"` becomes `1.20`.
///
/// Descriptors are normalized here, so a malformed one is reported before the
/// action ever runs.
pub fn parse_decimal_at<I, D>(paths: I) -> Result<ParseDecimal, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
{
    Ok(ParseDecimal {
        paths: normalize_all(paths)?,
    })
}

impl ParseDecimal {
    pub fn paths(&self) -> &[KeyPath] {
        &self.paths
    }
}

impl Action for ParseDecimal {
    fn run(&self, request: Request) -> Result<Request, StepError> {
        self.paths.iter().try_fold(request, |request, path| -> Result<Request, StepError> {
            let parsed = parse_decimal(request.get(path)?).ok_or_else(|| {
                StepError::new(format!("{} could not be parsed as a number.", path.last()))
            })?;
            Ok(request.put(path, Value::Number(parsed))?)
        })
    }
}

fn parse_decimal(value: &Value) -> Option<Number> {
    match value {
        Value::Number(number) => Some(number.clone()),
        Value::String(text) if text.contains('_') => None,
        Value::String(text) => {
            let decimal = Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()?;
            serde_json::from_str(&decimal.to_string()).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_decimal_keeps_scale() {
        let number = parse_decimal(&json!("1.20")).unwrap();
        assert_eq!(number.to_string(), "1.20");
    }

    #[test]
    fn test_parse_decimal_variants() {
        assert_eq!(parse_decimal(&json!("-0.5")).unwrap().to_string(), "-0.5");
        assert_eq!(parse_decimal(&json!("42")).unwrap().to_string(), "42");
        assert_eq!(parse_decimal(&json!("1e3")).unwrap().to_string(), "1000");
        assert_eq!(parse_decimal(&json!("+1.5")).unwrap().to_string(), "1.5");
        assert_eq!(parse_decimal(&json!(7)).unwrap().to_string(), "7");
    }

    #[test]
    fn test_parse_decimal_rejects_non_numbers() {
        assert!(parse_decimal(&json!("ab1.20")).is_none());
        assert!(parse_decimal(&json!("")).is_none());
        assert!(parse_decimal(&json!("1_000")).is_none());
        assert!(parse_decimal(&json!("1e_3")).is_none());
        assert!(parse_decimal(&json!(null)).is_none());
        assert!(parse_decimal(&json!(["1.0"])).is_none());
    }

    #[test]
    fn test_malformed_descriptor_is_rejected_up_front() {
        let fan_out = PathDescriptor::try_from(&json!({"a": {"b": ["c", "d"]}})).unwrap();
        assert!(parse_decimal_at([fan_out]).is_err());
    }
}
