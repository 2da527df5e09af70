//! Deterministic validation of a result structure against a schema.

use std::fmt;

use thiserror::Error;

use super::node::Schema;
use crate::value::{Map, Value};

/// Location of a value inside a result structure.
///
/// Displays as a JSON pointer (`/interfaces/Gi1~10~11/rate`), escaping `~`
/// and `/` inside keys so interface names stay unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// This path extended by one key.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    /// Keys from the root to this location.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// What kind of violation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required key is absent.
    MissingKey,

    /// A key is present that the fixed mapping does not declare.
    UnexpectedKey,

    /// The value has the wrong runtime type.
    TypeMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViolationKind::MissingKey => "missing key",
            ViolationKind::UnexpectedKey => "unexpected key",
            ViolationKind::TypeMismatch => "type mismatch",
        })
    }
}

/// The first schema violation found in a result structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {path}: expected {expected}, found {actual}")]
pub struct ValidationError {
    /// Where the violation is.
    pub path: KeyPath,

    /// What went wrong.
    pub kind: ViolationKind,

    /// The shape the schema declares at this location.
    pub expected: String,

    /// What is actually there (`"missing"` for absent keys).
    pub actual: String,
}

impl Schema {
    /// Validate a value against this schema.
    ///
    /// Traversal is depth-first. Fixed mappings are visited in field
    /// declaration order, then undeclared keys in lexicographic order;
    /// wildcard mappings in lexicographic key order. The reported violation
    /// therefore never depends on the insertion order of the value.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        check(self, value, &KeyPath::root())
    }

    /// Validate a root mapping against this schema.
    pub fn validate_map(&self, map: &Map) -> Result<(), ValidationError> {
        match self {
            Schema::Fixed(_) | Schema::Wildcard(_) => check_map(self, map, &KeyPath::root()),
            _ => Err(ValidationError {
                path: KeyPath::root(),
                kind: ViolationKind::TypeMismatch,
                expected: self.to_string(),
                actual: "mapping".to_string(),
            }),
        }
    }
}

fn check(schema: &Schema, value: &Value, path: &KeyPath) -> Result<(), ValidationError> {
    match (schema, value) {
        (Schema::Leaf(t), v) if t.kind() == v.kind() => Ok(()),
        (Schema::Alternatives(types), v) if types.iter().any(|t| t.kind() == v.kind()) => Ok(()),
        (Schema::Fixed(_) | Schema::Wildcard(_), Value::Map(map)) => check_map(schema, map, path),
        (Schema::List(inner), Value::List(items)) => {
            for (index, item) in items.iter().enumerate() {
                check(inner, item, &path.child(&index.to_string()))?;
            }
            Ok(())
        }
        (schema, value) => Err(ValidationError {
            path: path.clone(),
            kind: ViolationKind::TypeMismatch,
            expected: schema.to_string(),
            actual: value.kind().name().to_string(),
        }),
    }
}

fn check_map(schema: &Schema, map: &Map, path: &KeyPath) -> Result<(), ValidationError> {
    match schema {
        Schema::Fixed(fields) => {
            for field in fields {
                match map.get(&field.key) {
                    Some(value) => check(&field.schema, value, &path.child(&field.key))?,
                    None if field.optional => {}
                    None => {
                        return Err(ValidationError {
                            path: path.child(&field.key),
                            kind: ViolationKind::MissingKey,
                            expected: field.schema.to_string(),
                            actual: "missing".to_string(),
                        });
                    }
                }
            }

            let mut extras: Vec<&String> = map
                .keys()
                .filter(|key| !fields.iter().any(|f| &f.key == *key))
                .collect();
            extras.sort();

            match extras.first() {
                Some(key) => Err(ValidationError {
                    path: path.child(key),
                    kind: ViolationKind::UnexpectedKey,
                    expected: "no such key".to_string(),
                    actual: map[key.as_str()].kind().name().to_string(),
                }),
                None => Ok(()),
            }
        }
        Schema::Wildcard(inner) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                check(inner, &map[key.as_str()], &path.child(key))?;
            }
            Ok(())
        }
        Schema::Leaf(_) | Schema::Alternatives(_) | Schema::List(_) => {
            unreachable!("only mapping schemas reach check_map")
        }
    }
}
