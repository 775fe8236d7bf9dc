//! Principals, authentications and their attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute mapping: name to one-or-many string values.
pub type Attributes = BTreeMap<String, AttributeValues>;

/// The values of a single attribute, in the order they were released.
///
/// Deserializes from either a single string or a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany", into = "Vec<String>")]
pub struct AttributeValues(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for AttributeValues {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(v) => Self(vec![v]),
            OneOrMany::Many(vs) => Self(vs),
        }
    }
}

impl From<AttributeValues> for Vec<String> {
    fn from(values: AttributeValues) -> Self {
        values.0
    }
}

impl AttributeValues {
    /// Create from any list of values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// Iterate over the values.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether any value equals `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }
}

impl From<&str> for AttributeValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for AttributeValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for AttributeValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for AttributeValues {
    fn from(values: Vec<&str>) -> Self {
        Self::new(values)
    }
}

impl<S: Into<String>> FromIterator<S> for AttributeValues {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// The authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier (e.g., "casuser").
    pub id: String,

    /// Attributes released for this principal.
    #[serde(default)]
    pub attributes: Attributes,
}

impl Principal {
    /// Create a principal without attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
        }
    }

    /// Add (or replace) an attribute.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        values: impl Into<AttributeValues>,
    ) -> Self {
        self.attributes.insert(name.into(), values.into());
        self
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValues> {
        self.attributes.get(name)
    }
}

/// A completed authentication event.
///
/// Its attributes describe the authentication itself (method, time, context)
/// and are distinct from the principal's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    pub principal: Principal,

    #[serde(default)]
    pub attributes: Attributes,
}

impl Authentication {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            attributes: Attributes::new(),
        }
    }

    /// Add (or replace) an authentication attribute.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        values: impl Into<AttributeValues>,
    ) -> Self {
        self.attributes.insert(name.into(), values.into());
        self
    }
}
