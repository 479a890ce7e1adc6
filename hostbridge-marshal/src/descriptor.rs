//! Target type descriptors.
//!
//! A [`TypeDesc`] is the static description of the shape a tagged value
//! should be coerced into. Descriptors are immutable and nest freely
//! (list-of-dict-of-primitive and so on). The closed union is matched
//! exhaustively by the engine; there are no runtime type tests.

use crate::record::RecordDecode;
use crate::value::ManagedValue;
use hostbridge_types::{EntityKind, Rgba, Rotation, Vec3};
use std::fmt;
use std::sync::Arc;

/// Which entity kinds an entity-typed parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTarget {
    /// Any kind the pools can resolve.
    Any,
    /// Exactly this kind.
    Kind(EntityKind),
}

/// Declared symbolic names of an enum target.
///
/// Matching is case-insensitive over the ASCII range, which covers the
/// identifier character set enum names use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    name: String,
    variants: Vec<String>,
}

impl EnumDecl {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Index of the variant matching `text` case-insensitively.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.eq_ignore_ascii_case(text))
    }
}

/// Element descriptor for containers: the element type plus an optional
/// configured default used for null slots.
#[derive(Debug, Clone)]
pub struct ElementDesc {
    pub ty: TypeDesc,
    pub default: Option<ManagedValue>,
}

impl ElementDesc {
    #[must_use]
    pub fn of(ty: TypeDesc) -> Self {
        Self { ty, default: None }
    }

    #[must_use]
    pub fn with_default(ty: TypeDesc, default: ManagedValue) -> Self {
        Self {
            ty,
            default: Some(default),
        }
    }
}

/// Static description of a coercion target.
#[derive(Clone)]
pub enum TypeDesc {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
    Bytes,
    Vec3,
    Rotation,
    Rgba,
    /// Ordered sequence; elements coerced against the element descriptor.
    List(Box<ElementDesc>),
    /// String-keyed mapping. The declared key type must be `Str`; anything
    /// else rejects at coercion time.
    Dict {
        key: Box<TypeDesc>,
        value: Box<ElementDesc>,
    },
    Entity(EntityTarget),
    Enum(Arc<EnumDecl>),
    Callback,
    /// "Directly constructible from a tagged value": the engine re-encodes
    /// the value into a self-describing record and asks the target type to
    /// decode itself.
    Record(Arc<dyn RecordDecode>),
    /// Loose structural decode keeping the source shape.
    Any,
}

impl TypeDesc {
    /// List descriptor without a configured element default.
    #[must_use]
    pub fn list(element: TypeDesc) -> Self {
        TypeDesc::List(Box::new(ElementDesc::of(element)))
    }

    /// String-keyed dict descriptor without a configured value default.
    #[must_use]
    pub fn dict(value: TypeDesc) -> Self {
        TypeDesc::Dict {
            key: Box::new(TypeDesc::Str),
            value: Box::new(ElementDesc::of(value)),
        }
    }

    /// True for types whose null-slot default is a concrete zero value
    /// rather than Nil.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            TypeDesc::Bool
                | TypeDesc::I8
                | TypeDesc::I16
                | TypeDesc::I32
                | TypeDesc::I64
                | TypeDesc::U8
                | TypeDesc::U16
                | TypeDesc::U32
                | TypeDesc::U64
                | TypeDesc::F32
                | TypeDesc::F64
                | TypeDesc::Vec3
                | TypeDesc::Rotation
                | TypeDesc::Rgba
        )
    }

    /// The statically known zero/empty default for this type.
    ///
    /// Every kind has one; reference-shaped kinds default to Nil.
    #[must_use]
    pub fn zero_default(&self) -> ManagedValue {
        match self {
            TypeDesc::Bool => ManagedValue::Bool(false),
            TypeDesc::I8 => ManagedValue::I8(0),
            TypeDesc::I16 => ManagedValue::I16(0),
            TypeDesc::I32 => ManagedValue::I32(0),
            TypeDesc::I64 => ManagedValue::I64(0),
            TypeDesc::U8 => ManagedValue::U8(0),
            TypeDesc::U16 => ManagedValue::U16(0),
            TypeDesc::U32 => ManagedValue::U32(0),
            TypeDesc::U64 => ManagedValue::U64(0),
            TypeDesc::F32 => ManagedValue::F32(0.0),
            TypeDesc::F64 => ManagedValue::F64(0.0),
            TypeDesc::Vec3 => ManagedValue::Vec3(Vec3::ZERO),
            TypeDesc::Rotation => ManagedValue::Rotation(Rotation::ZERO),
            TypeDesc::Rgba => ManagedValue::Rgba(Rgba::ZERO),
            TypeDesc::Str
            | TypeDesc::Bytes
            | TypeDesc::List(_)
            | TypeDesc::Dict { .. }
            | TypeDesc::Entity(_)
            | TypeDesc::Enum(_)
            | TypeDesc::Callback
            | TypeDesc::Record(_)
            | TypeDesc::Any => ManagedValue::Nil,
        }
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Bool => f.write_str("Bool"),
            TypeDesc::I8 => f.write_str("I8"),
            TypeDesc::I16 => f.write_str("I16"),
            TypeDesc::I32 => f.write_str("I32"),
            TypeDesc::I64 => f.write_str("I64"),
            TypeDesc::U8 => f.write_str("U8"),
            TypeDesc::U16 => f.write_str("U16"),
            TypeDesc::U32 => f.write_str("U32"),
            TypeDesc::U64 => f.write_str("U64"),
            TypeDesc::F32 => f.write_str("F32"),
            TypeDesc::F64 => f.write_str("F64"),
            TypeDesc::Str => f.write_str("Str"),
            TypeDesc::Bytes => f.write_str("Bytes"),
            TypeDesc::Vec3 => f.write_str("Vec3"),
            TypeDesc::Rotation => f.write_str("Rotation"),
            TypeDesc::Rgba => f.write_str("Rgba"),
            TypeDesc::List(elem) => f.debug_tuple("List").field(elem).finish(),
            TypeDesc::Dict { key, value } => f
                .debug_struct("Dict")
                .field("key", key)
                .field("value", value)
                .finish(),
            TypeDesc::Entity(target) => f.debug_tuple("Entity").field(target).finish(),
            TypeDesc::Enum(decl) => f.debug_tuple("Enum").field(&decl.name()).finish(),
            TypeDesc::Callback => f.write_str("Callback"),
            TypeDesc::Record(decoder) => {
                f.debug_tuple("Record").field(&decoder.type_name()).finish()
            }
            TypeDesc::Any => f.write_str("Any"),
        }
    }
}
