//! Result structure produced by a scan.
//!
//! Every extractor returns a [`Map`]: string keys to [`Value`]s, nested to
//! whatever depth the extractor's schema declares. Maps keep insertion order
//! for display and serialization, but compare equal regardless of order.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A nested mapping from string keys to values.
pub type Map = IndexMap<String, Value>;

/// A single value in a result structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text, passed through from a capture.
    Str(String),

    /// Base-10 integer parsed from a capture.
    ///
    /// Wide enough for unsigned 64-bit counters.
    Int(i128),

    /// Flag derived from a capture.
    Bool(bool),

    /// Repeated values collected from several lines, in line order.
    List(Vec<Value>),

    /// Nested mapping.
    Map(Map),
}

/// Runtime kind of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Str,
    Int,
    Bool,
    List,
    Map,
}

impl Kind {
    /// Name of the kind as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Str => "str",
            Kind::Int => "int",
            Kind::Bool => "bool",
            Kind::List => "list",
            Kind::Map => "mapping",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Get the runtime kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Str(_) => Kind::Str,
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
        }
    }

    /// Get the string, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the flag, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the items, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the nested mapping, if this is a `Map`.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Follow a path of keys through nested mappings.
    ///
    /// ```
    /// use clishape::value::{Map, MapExt, Value};
    ///
    /// let mut inner = Map::new();
    /// inner.put("total_entries", 40_i64);
    /// let mut root = Map::new();
    /// root.put("summary", inner);
    ///
    /// let root = Value::Map(root);
    /// assert_eq!(root.lookup(&["summary", "total_entries"]), Some(&Value::Int(40)));
    /// assert_eq!(root.lookup(&["summary", "missing"]), None);
    /// ```
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |value, key| value.as_map()?.get(*key))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i.into())
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Int(i.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

/// Convenience writes on a [`Map`].
pub trait MapExt {
    /// Insert or overwrite a field.
    fn put(&mut self, key: &str, value: impl Into<Value>);

    /// Follow a path of keys through nested mappings.
    fn lookup(&self, path: &[&str]) -> Option<&Value>;
}

impl MapExt for Map {
    fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.insert(key.to_string(), value.into());
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let value = self.get(*first)?;
        value.lookup(rest)
    }
}
