//! Path descriptors and their canonical form.
//!
//! Steps address nested state with a [`PathDescriptor`]. The descriptor
//! grammar is deliberately loose so call sites read naturally, and
//! [`normalize`] turns it into a [`KeyPath`]: a non-empty, ordered list of
//! keys that always descends from the root of a request's state.
//!
//! # Grammar
//!
//! | Form                           | JSON spelling              | Keys          |
//! |--------------------------------|----------------------------|---------------|
//! | bare key                       | `"a"`                      | `a`           |
//! | pair with a terminal key       | `{"a": "b"}`               | `a.b`         |
//! | pair with a nested descriptor  | `{"a": {"b": "c"}}`        | `a.b.c`       |
//! | one-element list wrapping pair | `[{"a": "b"}]`             | `a.b`         |
//!
//! A descriptor encodes exactly one path. `{"a": {"b": ["c", "d"]}}` tries to
//! fan out to two terminal keys and is rejected; pass two descriptors instead.
//!
//! # Example
//!
//! ```rust
//! use stepwise_core::path::{normalize, PathDescriptor};
//!
//! let descriptor = PathDescriptor::nested("order", PathDescriptor::pair("line", "price"));
//! let path = normalize(&descriptor)?;
//! assert_eq!(path.to_string(), "order.line.price");
//! # Ok::<(), stepwise_core::InvalidPathError>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InvalidPathError;

/// A single segment of a path into state.
pub type Key = String;

/// Caller-supplied description of one descent path into state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathDescriptor {
    /// A bare key.
    Key(Key),
    /// A key followed by either a terminal key or a nested list descriptor.
    Pair(Key, Box<PathDescriptor>),
    /// A list. Only a single wrapped pair is a valid list.
    List(Vec<PathDescriptor>),
}

impl PathDescriptor {
    pub fn key(key: impl Into<Key>) -> Self {
        Self::Key(key.into())
    }

    /// `(key, terminal)`: descend to `key`, then to `terminal`.
    ///
    /// Wrapped in a one-element list, matching the keyword-list spelling
    /// `[key: terminal]`.
    pub fn pair(key: impl Into<Key>, terminal: impl Into<Key>) -> Self {
        Self::List(vec![Self::Pair(
            key.into(),
            Box::new(Self::Key(terminal.into())),
        )])
    }

    /// `(key, inner)`: descend to `key`, then follow `inner`, which is
    /// normally another wrapped pair.
    pub fn nested(key: impl Into<Key>, inner: PathDescriptor) -> Self {
        Self::List(vec![Self::Pair(key.into(), Box::new(inner))])
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = PathDescriptor>,
    {
        Self::List(items.into_iter().collect())
    }

    /// Shorthand for [`normalize`].
    pub fn normalize(&self) -> Result<KeyPath, InvalidPathError> {
        normalize(self)
    }
}

impl From<&str> for PathDescriptor {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathDescriptor {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<KeyPath> for PathDescriptor {
    fn from(path: KeyPath) -> Self {
        let mut keys = path.0.into_iter().rev();
        // KeyPath is never empty
        let mut descriptor = Self::Key(keys.next().unwrap_or_default());
        let mut terminal = true;
        for key in keys {
            let inner = if terminal {
                descriptor
            } else {
                Self::List(vec![descriptor])
            };
            descriptor = Self::Pair(key, Box::new(inner));
            terminal = false;
        }
        match descriptor {
            pair @ Self::Pair(..) => Self::List(vec![pair]),
            key => key,
        }
    }
}

/// Reads the JSON spelling of the grammar: strings are bare keys, arrays are
/// lists and objects are lists of pairs, one pair per entry.
///
/// Inside an array an object's entries are spliced into the surrounding list,
/// the way keyword lists read, so `[{"a": "b"}]` is a list wrapping one pair.
impl TryFrom<&Value> for PathDescriptor {
    type Error = InvalidPathError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(key) => Ok(Self::Key(key.clone())),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(entries) => list.extend(pairs(entries)?),
                        other => list.push(Self::try_from(other)?),
                    }
                }
                Ok(Self::List(list))
            }
            Value::Object(entries) => pairs(entries).map(Self::List),
            other => Err(InvalidPathError::new(
                other,
                "only strings, arrays and objects describe paths",
            )),
        }
    }
}

fn pairs(entries: &Map<String, Value>) -> Result<Vec<PathDescriptor>, InvalidPathError> {
    entries
        .iter()
        .map(|(key, inner)| {
            let inner = PathDescriptor::try_from(inner)?;
            Ok::<_, InvalidPathError>(PathDescriptor::Pair(key.clone(), Box::new(inner)))
        })
        .collect()
}

impl fmt::Display for PathDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", Value::from(key.as_str())),
            Self::Pair(key, inner) => write!(f, "{{{}: {}}}", Value::from(key.as_str()), inner),
            Self::List(items)
                if !items.is_empty() && items.iter().all(|i| matches!(i, Self::Pair(..))) =>
            {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if let Self::Pair(key, inner) = item {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}", Value::from(key.as_str()), inner)?;
                    }
                }
                write!(f, "}}")
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Canonical descent path: an ordered, non-empty list of keys rooted at state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Key>", into = "Vec<Key>")]
pub struct KeyPath(Vec<Key>);

impl KeyPath {
    pub fn new<I, K>(first: impl Into<Key>, rest: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let mut keys = vec![first.into()];
        keys.extend(rest.into_iter().map(Into::into));
        Self(keys)
    }

    pub fn single(key: impl Into<Key>) -> Self {
        Self(vec![key.into()])
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// The final segment; error messages name a path by it.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of keys, i.e. the levels the path descends.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    fn prepend(mut self, key: Key) -> Self {
        self.0.insert(0, key);
        self
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self::single(key)
    }
}

impl TryFrom<Vec<Key>> for KeyPath {
    type Error = InvalidPathError;

    fn try_from(keys: Vec<Key>) -> Result<Self, Self::Error> {
        if keys.is_empty() {
            return Err(InvalidPathError::new("[]", "a path needs at least one key"));
        }
        Ok(Self(keys))
    }
}

impl From<KeyPath> for Vec<Key> {
    fn from(path: KeyPath) -> Self {
        path.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Converts a descriptor into its canonical key list.
///
/// Rules, by shape:
/// - `key` gives `[key]`
/// - `(key, terminal)` gives `[key, terminal]`
/// - `(key, [..])` gives `key` followed by the normalized inner list
/// - `[(key, ..)]` unwraps the single pair and applies the two rules above
///
/// Anything else, including empty lists, lists of bare keys and lists with
/// more than one element, is an [`InvalidPathError`].
pub fn normalize(descriptor: &PathDescriptor) -> Result<KeyPath, InvalidPathError> {
    normalize_within(descriptor, descriptor)
}

/// Normalizes every descriptor, stopping at the first malformed one.
pub fn normalize_all<I, D>(descriptors: I) -> Result<Vec<KeyPath>, InvalidPathError>
where
    I: IntoIterator<Item = D>,
    D: Into<PathDescriptor>,
{
    descriptors
        .into_iter()
        .map(|descriptor| normalize(&descriptor.into()))
        .collect()
}

fn normalize_within(
    descriptor: &PathDescriptor,
    root: &PathDescriptor,
) -> Result<KeyPath, InvalidPathError> {
    match descriptor {
        PathDescriptor::Key(key) => Ok(KeyPath::single(checked_key(key, root)?)),
        PathDescriptor::Pair(key, inner) => {
            let head = checked_key(key, root)?;
            match inner.as_ref() {
                PathDescriptor::Key(terminal) => {
                    Ok(KeyPath::new(head, [checked_key(terminal, root)?]))
                }
                PathDescriptor::List(_) => Ok(normalize_within(inner, root)?.prepend(head)),
                PathDescriptor::Pair(..) => Err(InvalidPathError::new(
                    root,
                    "a pair must hold a terminal key or a list, not a bare pair",
                )),
            }
        }
        PathDescriptor::List(items) => match items.as_slice() {
            [pair @ PathDescriptor::Pair(..)] => normalize_within(pair, root),
            [] => Err(InvalidPathError::new(root, "an empty list names no key")),
            [_] => Err(InvalidPathError::new(
                root,
                "a list must wrap a pair, not a bare key or another list",
            )),
            many => Err(InvalidPathError::new(
                root,
                format!("a list must wrap exactly one pair, found {}", many.len()),
            )),
        },
    }
}

fn checked_key(key: &str, root: &PathDescriptor) -> Result<Key, InvalidPathError> {
    if key.is_empty() {
        return Err(InvalidPathError::new(root, "keys must not be empty"));
    }
    Ok(key.to_string())
}
