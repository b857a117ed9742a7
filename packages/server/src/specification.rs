//! Equality specifications used to look up entities by a single field.
//!
//! A specification is plain data: a field name and the value it must equal.
//! [`crate::store::EntityStore::find_one`] turns it into a `WHERE field = value`
//! predicate against the target entity's columns.

use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;

/// Comparison value carried by a specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecValue {
    Uuid(Uuid),
    Int(i32),
    Text(String),
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(id) => write!(f, "{id}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<SpecValue> for sea_orm::Value {
    fn from(value: SpecValue) -> Self {
        match value {
            SpecValue::Uuid(id) => id.into(),
            SpecValue::Int(n) => n.into(),
            SpecValue::Text(s) => s.into(),
        }
    }
}

pub trait Specification: Send + Sync {
    /// Field name to expected value.
    fn fields(&self) -> BTreeMap<&'static str, SpecValue>;

    /// Human-readable form used in error messages, e.g. `username = "alice1"`.
    fn describe(&self) -> String {
        self.fields()
            .iter()
            .map(|(field, value)| format!("{field} = {value}"))
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

/// Matches the `id` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSpecification(SpecValue);

impl IdSpecification {
    pub fn new(id: impl Into<IdSpecification>) -> Self {
        id.into()
    }
}

impl From<Uuid> for IdSpecification {
    fn from(id: Uuid) -> Self {
        Self(SpecValue::Uuid(id))
    }
}

impl From<i32> for IdSpecification {
    fn from(id: i32) -> Self {
        Self(SpecValue::Int(id))
    }
}

impl Specification for IdSpecification {
    fn fields(&self) -> BTreeMap<&'static str, SpecValue> {
        BTreeMap::from([("id", self.0.clone())])
    }
}

/// Matches the `username` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameSpecification(String);

impl UsernameSpecification {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }
}

impl Specification for UsernameSpecification {
    fn fields(&self) -> BTreeMap<&'static str, SpecValue> {
        BTreeMap::from([("username", SpecValue::Text(self.0.clone()))])
    }
}

/// Matches the `email` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSpecification(String);

impl EmailSpecification {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }
}

impl Specification for EmailSpecification {
    fn fields(&self) -> BTreeMap<&'static str, SpecValue> {
        BTreeMap::from([("email", SpecValue::Text(self.0.clone()))])
    }
}

/// Matches the `name` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSpecification(String);

impl NameSpecification {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Specification for NameSpecification {
    fn fields(&self) -> BTreeMap<&'static str, SpecValue> {
        BTreeMap::from([("name", SpecValue::Text(self.0.clone()))])
    }
}
