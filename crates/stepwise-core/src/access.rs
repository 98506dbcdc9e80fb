//! Reading and writing nested state through a [`KeyPath`].
//!
//! Every key but the last must name an existing mapping; nothing is created on
//! the way down. The last key is read from, or written to, the innermost
//! mapping.

use serde_json::{Map, Value};

use crate::error::AccessError;
use crate::path::{Key, KeyPath};

/// The working data carried by a request.
pub type State = Map<String, Value>;

/// Typed access to a nested mapping.
pub trait NestedAccess: Sized {
    /// Read the value at `path`.
    fn get_path(&self, path: &KeyPath) -> Result<&Value, AccessError>;

    /// Consume the container and return it with `value` stored at `path`.
    fn set_path(self, path: &KeyPath, value: Value) -> Result<Self, AccessError>;
}

impl NestedAccess for State {
    fn get_path(&self, path: &KeyPath) -> Result<&Value, AccessError> {
        let keys = path.keys();
        let mut current = self;
        for key in &keys[..keys.len() - 1] {
            current = descend(current, key, path)?;
        }
        current
            .get(path.last())
            .ok_or_else(|| key_not_found(path.last(), path))
    }

    fn set_path(mut self, path: &KeyPath, value: Value) -> Result<Self, AccessError> {
        set_within(&mut self, path.keys(), value, path)?;
        Ok(self)
    }
}

fn descend<'a>(map: &'a State, key: &str, path: &KeyPath) -> Result<&'a State, AccessError> {
    match map.get(key) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(not_a_mapping(key, path)),
        None => Err(key_not_found(key, path)),
    }
}

fn set_within(
    map: &mut State,
    keys: &[Key],
    value: Value,
    path: &KeyPath,
) -> Result<(), AccessError> {
    match keys {
        [last] => {
            map.insert(last.clone(), value);
            Ok(())
        }
        [key, rest @ ..] => match map.get_mut(key) {
            Some(Value::Object(inner)) => set_within(inner, rest, value, path),
            Some(_) => Err(not_a_mapping(key, path)),
            None => Err(key_not_found(key, path)),
        },
        // KeyPath is never empty
        [] => Ok(()),
    }
}

fn key_not_found(key: &str, path: &KeyPath) -> AccessError {
    AccessError::KeyNotFound {
        key: key.to_string(),
        path: path.to_string(),
    }
}

fn not_a_mapping(key: &str, path: &KeyPath) -> AccessError {
    AccessError::NotAMapping {
        key: key.to_string(),
        path: path.to_string(),
    }
}
