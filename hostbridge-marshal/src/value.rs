//! The strongly typed result of a coercion.

use crate::callback::BoundCallback;
use crate::descriptor::EnumDecl;
use hostbridge_pool::ObjectRef;
use hostbridge_types::{Rgba, Rotation, Vec3};
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved enum constant: the declaration plus the matched variant.
#[derive(Debug, Clone)]
pub struct EnumValue {
    decl: Arc<EnumDecl>,
    index: usize,
}

impl EnumValue {
    #[must_use]
    pub fn new(decl: Arc<EnumDecl>, index: usize) -> Self {
        Self { decl, index }
    }

    /// Position of the matched variant in the declaration.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Canonical (declared) spelling of the matched variant.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.decl.variants()[self.index]
    }

    /// The declaration this constant belongs to.
    #[must_use]
    pub fn decl(&self) -> &Arc<EnumDecl> {
        &self.decl
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.decl.name() == other.decl.name()
    }
}

/// A value matching its target descriptor.
///
/// Width-specific numeric variants keep truncation results observable;
/// `Nil` stands for both the null value and every non-fatal mismatch of a
/// reference-shaped target.
#[derive(Debug, Clone, Default)]
pub enum ManagedValue {
    #[default]
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Vec3(Vec3),
    Rotation(Rotation),
    Rgba(Rgba),
    List(Vec<ManagedValue>),
    Dict(HashMap<String, ManagedValue>),
    /// Canonical pool wrapper; equality is wrapper identity.
    Entity(ObjectRef),
    Callback(BoundCallback),
    Enum(EnumValue),
}

impl ManagedValue {
    /// Returns true for the null/unset value.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, ManagedValue::Nil)
    }

    /// Borrows the string payload, if this is the string variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ManagedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the list payload, if this is the list variant.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ManagedValue]> {
        match self {
            ManagedValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the dict payload, if this is the dict variant.
    #[must_use]
    pub fn as_dict(&self) -> Option<&HashMap<String, ManagedValue>> {
        match self {
            ManagedValue::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Borrows the entity wrapper, if this is the entity variant.
    #[must_use]
    pub fn as_entity(&self) -> Option<&ObjectRef> {
        match self {
            ManagedValue::Entity(object) => Some(object),
            _ => None,
        }
    }
}

impl PartialEq for ManagedValue {
    fn eq(&self, other: &Self) -> bool {
        use ManagedValue::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (F32(a), F32(b)) => a == b,
            (F64(a), F64(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Vec3(a), Vec3(b)) => a == b,
            (Rotation(a), Rotation(b)) => a == b,
            (Rgba(a), Rgba(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Dict(a), Dict(b)) => a == b,
            (Entity(a), Entity(b)) => Arc::ptr_eq(a, b),
            (Callback(a), Callback(b)) => a == b,
            (Enum(a), Enum(b)) => a == b,
            _ => false,
        }
    }
}
