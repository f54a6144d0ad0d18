//! Ordered attribute sets and the element kinds they apply to.
//!
//! # Overview
//!
//! - [`AttributeSet`]: Ordered key-value mapping with override semantics.
//! - [`AttributeKind`]: The three kinds of defaults a scope can carry
//!   (`graph`, `node`, `edge`).
//! - [`attrs!`](crate::attrs!): Macro for building an [`AttributeSet`] inline.
//!
//! Values are opaque strings. Nothing here validates them; Graphviz does that
//! when it parses the serialized description.
//!
//! # Example
//!
//! ```
//! use dotloom_core::attrs;
//!
//! let defaults = attrs! { "shape" => "box", "fillcolor" => "#fffef7" };
//! let explicit = attrs! { "fillcolor" => "#E8F4F8", "width" => "2.0" };
//!
//! let effective = defaults.merge(&explicit);
//! assert_eq!(effective.get("fillcolor"), Some("#E8F4F8"));
//! assert_eq!(effective.get("shape"), Some("box"));
//! // Neither operand changed.
//! assert_eq!(defaults.get("fillcolor"), Some("#fffef7"));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// The kind of element a default attribute set applies to.
///
/// Displays as the DOT keyword used for default statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Graph-level attributes (`graph [...]`), applying to the scope itself.
    Graph,
    /// Node defaults (`node [...]`).
    Node,
    /// Edge defaults (`edge [...]`).
    Edge,
}

impl AttributeKind {
    /// All kinds, in the order their default statements are emitted.
    pub const ALL: [AttributeKind; 3] = [Self::Graph, Self::Node, Self::Edge];

    /// Returns the DOT keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An ordered mapping of attribute names to values.
///
/// Keys are unique. Setting an existing key replaces its value in place, so
/// the first-insertion order is what serialization sees.
///
/// Deserializes from a table whose values are strings, numbers or booleans,
/// which lets configuration files carry default sets:
///
/// ```toml
/// fontname = "Comic Sans MS"
/// fontsize = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: IndexMap<String, String>,
}

impl AttributeSet {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, overwriting any earlier value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns a new set holding `self` then `other`, `other` winning on
    /// conflicting keys.
    pub fn merge(&self, other: &AttributeSet) -> AttributeSet {
        let mut merged = self.clone();
        merged.extend(other.iter());
        merged
    }
}

impl<K, V> Extend<(K, V)> for AttributeSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Scalar accepted as an attribute value when deserializing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl AttributeValue {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for AttributeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = IndexMap::<String, AttributeValue>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(key, value)| (key, value.into_string()))
            .collect())
    }
}

/// Builds an [`AttributeSet`] from `key => value` pairs.
///
/// ```
/// use dotloom_core::attrs;
///
/// let set = attrs! { "label" => "Start", "shape" => "box" };
/// assert_eq!(set.len(), 2);
///
/// let empty = attrs! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::attributes::AttributeSet::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut set = $crate::attributes::AttributeSet::new();
        $(
            set.set($key, $value);
        )+
        set
    }};
}
