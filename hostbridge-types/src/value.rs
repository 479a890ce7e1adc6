//! The dynamically tagged value crossing the host/managed boundary.

use crate::handle::{CallbackId, EntityRef};
use crate::math::{Rgba, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A dynamically typed value originating from the host runtime.
///
/// Exactly one variant is active at a time; conversions read but never
/// mutate the source value. Composite variants nest further tagged values.
/// Positions and rotations both arrive as [`TaggedValue::Vector3`] — the
/// host does not distinguish them at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaggedValue {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<TaggedValue>),
    Dict(HashMap<String, TaggedValue>),
    Callback(CallbackId),
    Entity(EntityRef),
    Vector3(Vec3),
    Rgba(Rgba),
}

impl TaggedValue {
    /// Returns true for the null variant.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, TaggedValue::Nil)
    }

    /// Short variant name used in logs and diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            TaggedValue::Nil => "nil",
            TaggedValue::Bool(_) => "bool",
            TaggedValue::Int(_) => "int",
            TaggedValue::Uint(_) => "uint",
            TaggedValue::Double(_) => "double",
            TaggedValue::Str(_) => "str",
            TaggedValue::Bytes(_) => "bytes",
            TaggedValue::List(_) => "list",
            TaggedValue::Dict(_) => "dict",
            TaggedValue::Callback(_) => "callback",
            TaggedValue::Entity(_) => "entity",
            TaggedValue::Vector3(_) => "vector3",
            TaggedValue::Rgba(_) => "rgba",
        }
    }

    /// Borrows the string payload, if this is the string variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the list payload, if this is the list variant.
    #[must_use]
    pub fn as_list(&self) -> Option<&[TaggedValue]> {
        match self {
            TaggedValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the dict payload, if this is the dict variant.
    #[must_use]
    pub fn as_dict(&self) -> Option<&HashMap<String, TaggedValue>> {
        match self {
            TaggedValue::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the entity reference, if this is the entity variant.
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityRef> {
        match self {
            TaggedValue::Entity(entity) => Some(*entity),
            _ => None,
        }
    }
}

impl Default for TaggedValue {
    fn default() -> Self {
        TaggedValue::Nil
    }
}

impl From<bool> for TaggedValue {
    fn from(v: bool) -> Self {
        TaggedValue::Bool(v)
    }
}

impl From<i64> for TaggedValue {
    fn from(v: i64) -> Self {
        TaggedValue::Int(v)
    }
}

impl From<u64> for TaggedValue {
    fn from(v: u64) -> Self {
        TaggedValue::Uint(v)
    }
}

impl From<f64> for TaggedValue {
    fn from(v: f64) -> Self {
        TaggedValue::Double(v)
    }
}

impl From<&str> for TaggedValue {
    fn from(v: &str) -> Self {
        TaggedValue::Str(v.to_owned())
    }
}

impl From<String> for TaggedValue {
    fn from(v: String) -> Self {
        TaggedValue::Str(v)
    }
}

impl From<Vec3> for TaggedValue {
    fn from(v: Vec3) -> Self {
        TaggedValue::Vector3(v)
    }
}

impl From<Rgba> for TaggedValue {
    fn from(v: Rgba) -> Self {
        TaggedValue::Rgba(v)
    }
}

impl From<EntityRef> for TaggedValue {
    fn from(v: EntityRef) -> Self {
        TaggedValue::Entity(v)
    }
}
