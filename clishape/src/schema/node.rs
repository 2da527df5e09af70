//! Shape nodes for declaring what a result structure must look like.

use std::fmt;

use crate::value::Kind;

/// Primitive leaf types a schema can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    Str,
    Int,
    Bool,
}

impl LeafType {
    /// The value kind this leaf type accepts.
    pub fn kind(self) -> Kind {
        match self {
            LeafType::Str => Kind::Str,
            LeafType::Int => Kind::Int,
            LeafType::Bool => Kind::Bool,
        }
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().name())
    }
}

/// A declared field of a fixed mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key of the field.
    pub key: String,

    /// Whether the field may be absent.
    pub optional: bool,

    /// Shape of the field's value.
    pub schema: Schema,
}

/// A node in a schema tree.
///
/// Schemas are built by value from the leaves up, so every schema is a finite
/// tree:
///
/// ```
/// use clishape::schema::Schema;
///
/// let neighbor = Schema::fixed()
///     .required("ip", Schema::str())
///     .required("origin", Schema::str())
///     .optional("private_vlan", Schema::int());
///
/// let schema = Schema::fixed().optional(
///     "interfaces",
///     Schema::wildcard(Schema::fixed().required("neighbors", Schema::wildcard(neighbor))),
/// );
/// assert!(schema.field("interfaces").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A primitive value of exactly this type.
    Leaf(LeafType),

    /// A primitive value of any of these types.
    Alternatives(Vec<LeafType>),

    /// A mapping with a declared set of keys.
    Fixed(Vec<Field>),

    /// A mapping with arbitrary keys, every value shaped like the inner node.
    Wildcard(Box<Schema>),

    /// A list whose items are all shaped like the inner node.
    List(Box<Schema>),
}

impl Schema {
    /// A string leaf.
    pub fn str() -> Self {
        Schema::Leaf(LeafType::Str)
    }

    /// An integer leaf.
    pub fn int() -> Self {
        Schema::Leaf(LeafType::Int)
    }

    /// A boolean leaf.
    pub fn bool() -> Self {
        Schema::Leaf(LeafType::Bool)
    }

    /// A leaf that may be any of the given types.
    pub fn any_of(types: impl IntoIterator<Item = LeafType>) -> Self {
        Schema::Alternatives(types.into_iter().collect())
    }

    /// An empty fixed mapping; add fields with [`required`](Self::required)
    /// and [`optional`](Self::optional).
    pub fn fixed() -> Self {
        Schema::Fixed(Vec::new())
    }

    /// A mapping with arbitrary keys.
    pub fn wildcard(inner: Schema) -> Self {
        Schema::Wildcard(Box::new(inner))
    }

    /// A list of items.
    pub fn list(inner: Schema) -> Self {
        Schema::List(Box::new(inner))
    }

    /// Add a required field to a fixed mapping.
    pub fn required(self, key: impl Into<String>, schema: Schema) -> Self {
        self.with_field(key.into(), false, schema)
    }

    /// Add an optional field to a fixed mapping.
    pub fn optional(self, key: impl Into<String>, schema: Schema) -> Self {
        self.with_field(key.into(), true, schema)
    }

    /// Add several required fields sharing one shape.
    pub fn required_all(self, keys: &[&str], schema: Schema) -> Self {
        keys.iter()
            .fold(self, |acc, key| acc.required(*key, schema.clone()))
    }

    /// Add several optional fields sharing one shape.
    pub fn optional_all(self, keys: &[&str], schema: Schema) -> Self {
        keys.iter()
            .fold(self, |acc, key| acc.optional(*key, schema.clone()))
    }

    fn with_field(self, key: String, optional: bool, schema: Schema) -> Self {
        match self {
            Schema::Fixed(mut fields) => {
                // Redeclaring a key replaces it
                fields.retain(|f| f.key != key);
                fields.push(Field {
                    key,
                    optional,
                    schema,
                });
                Schema::Fixed(fields)
            }
            other => {
                debug_assert!(false, "fields can only be added to a fixed mapping");
                other
            }
        }
    }

    /// Get a declared field of a fixed mapping.
    pub fn field(&self, key: &str) -> Option<&Field> {
        match self {
            Schema::Fixed(fields) => fields.iter().find(|f| f.key == key),
            _ => None,
        }
    }

    /// Maximum nesting depth of this schema (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Schema::Leaf(_) | Schema::Alternatives(_) => 1,
            Schema::Fixed(fields) => {
                1 + fields.iter().map(|f| f.schema.depth()).max().unwrap_or(0)
            }
            Schema::Wildcard(inner) | Schema::List(inner) => 1 + inner.depth(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Leaf(t) => write!(f, "{}", t),
            Schema::Alternatives(types) => {
                let names: Vec<&str> = types.iter().map(|t| t.kind().name()).collect();
                f.write_str(&names.join(" | "))
            }
            Schema::Fixed(_) | Schema::Wildcard(_) => f.write_str("mapping"),
            Schema::List(_) => f.write_str("list"),
        }
    }
}
