//! The coercion engine proper.
//!
//! One rule set per target kind, matched exhaustively over the descriptor
//! union. Malformed input never raises: numeric targets fall back to zero,
//! reference-shaped targets to Nil. The numeric narrowing is wrap-around
//! two's-complement truncation, not saturation — the host boundary may send
//! any numeric representation and silent precision loss is the documented
//! trade against crashing the consumer.

use crate::callback::{BoundCallback, HostInvoker};
use crate::descriptor::{ElementDesc, EntityTarget, EnumDecl, TypeDesc};
use crate::record::{to_record, RecordDecode};
use crate::value::{EnumValue, ManagedValue};
use hostbridge_pool::PoolRegistry;
use hostbridge_types::{Rotation, TaggedValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Integer targets: accepted from any numeric representation, parsed
/// strings, and booleans. Doubles truncate toward zero through i128, then
/// wrap to the target width; string parses happen at the target width and
/// fail silently to zero, exactly like the host API's reference behavior.
macro_rules! coerce_int {
    ($value:expr, $ty:ty, $variant:ident) => {
        ManagedValue::$variant(match $value {
            TaggedValue::Int(i) => *i as $ty,
            TaggedValue::Uint(u) => *u as $ty,
            TaggedValue::Double(d) => (*d as i128) as $ty,
            TaggedValue::Str(s) => s.trim().parse::<$ty>().unwrap_or(0),
            TaggedValue::Bool(b) => *b as u8 as $ty,
            _ => 0,
        })
    };
}

macro_rules! coerce_float {
    ($value:expr, $ty:ty, $variant:ident) => {
        ManagedValue::$variant(match $value {
            TaggedValue::Int(i) => *i as $ty,
            TaggedValue::Uint(u) => *u as $ty,
            TaggedValue::Double(d) => *d as $ty,
            TaggedValue::Str(s) => s.trim().parse::<$ty>().unwrap_or(0.0),
            TaggedValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        })
    };
}

/// The coercion engine.
///
/// Stateless per call; carries only the two external collaborators it
/// delegates to — the entity pools for reference resolution and the host
/// invoker for callback forwarding. Cheap to clone.
#[derive(Clone)]
pub struct Marshaler {
    registry: Arc<PoolRegistry>,
    invoker: Arc<dyn HostInvoker>,
}

impl Marshaler {
    #[must_use]
    pub fn new(registry: Arc<PoolRegistry>, invoker: Arc<dyn HostInvoker>) -> Self {
        Self { registry, invoker }
    }

    /// The pool registry entity references resolve through.
    #[must_use]
    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// The host call-forwarding channel.
    #[must_use]
    pub fn invoker(&self) -> &Arc<dyn HostInvoker> {
        &self.invoker
    }

    /// Coerces a tagged value against a target descriptor.
    ///
    /// Total over all inputs: type mismatches and parse failures resolve
    /// to the target's default, never an error.
    #[must_use]
    pub fn coerce(&self, value: &TaggedValue, desc: &TypeDesc) -> ManagedValue {
        match desc {
            TypeDesc::Bool => coerce_bool(value),
            TypeDesc::I8 => coerce_int!(value, i8, I8),
            TypeDesc::I16 => coerce_int!(value, i16, I16),
            TypeDesc::I32 => coerce_int!(value, i32, I32),
            TypeDesc::I64 => coerce_int!(value, i64, I64),
            TypeDesc::U8 => coerce_int!(value, u8, U8),
            TypeDesc::U16 => coerce_int!(value, u16, U16),
            TypeDesc::U32 => coerce_int!(value, u32, U32),
            TypeDesc::U64 => coerce_int!(value, u64, U64),
            TypeDesc::F32 => coerce_float!(value, f32, F32),
            TypeDesc::F64 => coerce_float!(value, f64, F64),
            TypeDesc::Str => coerce_str(value),
            TypeDesc::Bytes => match value {
                TaggedValue::Bytes(bytes) => ManagedValue::Bytes(bytes.clone()),
                _ => ManagedValue::Nil,
            },
            TypeDesc::Vec3 => match value {
                TaggedValue::Vector3(v) => ManagedValue::Vec3(*v),
                _ => desc.zero_default(),
            },
            TypeDesc::Rotation => match value {
                TaggedValue::Vector3(v) => ManagedValue::Rotation(Rotation::from(*v)),
                _ => desc.zero_default(),
            },
            TypeDesc::Rgba => match value {
                TaggedValue::Rgba(c) => ManagedValue::Rgba(*c),
                _ => desc.zero_default(),
            },
            TypeDesc::List(element) => self.coerce_list(value, element),
            TypeDesc::Dict { key, value: elem } => self.coerce_dict(value, key, elem),
            TypeDesc::Entity(target) => self.coerce_entity(value, *target),
            TypeDesc::Enum(decl) => coerce_enum(value, decl),
            TypeDesc::Callback => match value {
                TaggedValue::Callback(id) => {
                    ManagedValue::Callback(BoundCallback::new(*id, self.clone()))
                }
                _ => ManagedValue::Nil,
            },
            TypeDesc::Record(decoder) => self.coerce_record(value, decoder.as_ref()),
            TypeDesc::Any => self.decode_any(value),
        }
    }

    /// Sequence target: element-wise recursion with the null-default
    /// policy. String elements take a fast path that only accepts strings
    /// or null.
    fn coerce_list(&self, value: &TaggedValue, element: &ElementDesc) -> ManagedValue {
        let Some(items) = value.as_list() else {
            return ManagedValue::Nil;
        };

        if matches!(element.ty, TypeDesc::Str) {
            let out = items
                .iter()
                .map(|item| match item {
                    TaggedValue::Str(s) => ManagedValue::Str(s.clone()),
                    _ => ManagedValue::Nil,
                })
                .collect();
            return ManagedValue::List(out);
        }

        // A default computed for one null slot is reused for the rest of
        // this call; cloning into each slot keeps slots independent.
        let mut slot_default: Option<ManagedValue> = element.default.clone();
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if item.is_nil() {
                let default = slot_default
                    .get_or_insert_with(|| null_slot_default(&element.ty));
                out.push(default.clone());
            } else {
                out.push(self.coerce(item, &element.ty));
            }
        }
        ManagedValue::List(out)
    }

    /// Map target: string keys only, values recursively coerced with the
    /// same null-default policy as sequences.
    fn coerce_dict(
        &self,
        value: &TaggedValue,
        key: &TypeDesc,
        element: &ElementDesc,
    ) -> ManagedValue {
        let Some(entries) = value.as_dict() else {
            return ManagedValue::Nil;
        };
        if !matches!(key, TypeDesc::Str) {
            return ManagedValue::Nil;
        }

        let mut slot_default: Option<ManagedValue> = element.default.clone();
        let mut out = HashMap::with_capacity(entries.len());
        for (name, entry) in entries {
            if entry.is_nil() {
                let default = slot_default
                    .get_or_insert_with(|| null_slot_default(&element.ty));
                out.insert(name.clone(), default.clone());
            } else {
                out.insert(name.clone(), self.coerce(entry, &element.ty));
            }
        }
        ManagedValue::Dict(out)
    }

    /// Entity target: the kind tag must be assignable to the declared
    /// target; resolution is delegated to the identity pools.
    fn coerce_entity(&self, value: &TaggedValue, target: EntityTarget) -> ManagedValue {
        let Some(entity) = value.as_entity() else {
            return ManagedValue::Nil;
        };
        let assignable = match target {
            EntityTarget::Any => true,
            EntityTarget::Kind(kind) => kind == entity.kind,
        };
        if !assignable {
            return ManagedValue::Nil;
        }
        match self.registry.get_or_create(entity.handle, entity.kind) {
            Some(object) => ManagedValue::Entity(object),
            None => ManagedValue::Nil,
        }
    }

    /// Convertible fallback: re-encode the dict into a self-describing
    /// record and let the target decode itself. The record is scoped to
    /// this call and dropped on every exit path.
    fn coerce_record(&self, value: &TaggedValue, decoder: &dyn RecordDecode) -> ManagedValue {
        if value.as_dict().is_none() {
            return ManagedValue::Nil;
        }
        let record = to_record(value);
        decoder.decode(&record).unwrap_or(ManagedValue::Nil)
    }

    /// Loose structural decode: keeps the source shape, resolving entity
    /// references and binding callbacks along the way.
    fn decode_any(&self, value: &TaggedValue) -> ManagedValue {
        match value {
            TaggedValue::Nil => ManagedValue::Nil,
            TaggedValue::Bool(b) => ManagedValue::Bool(*b),
            TaggedValue::Int(i) => ManagedValue::I64(*i),
            TaggedValue::Uint(u) => ManagedValue::U64(*u),
            TaggedValue::Double(d) => ManagedValue::F64(*d),
            TaggedValue::Str(s) => ManagedValue::Str(s.clone()),
            TaggedValue::Bytes(bytes) => ManagedValue::Bytes(bytes.clone()),
            TaggedValue::List(items) => {
                ManagedValue::List(items.iter().map(|i| self.decode_any(i)).collect())
            }
            TaggedValue::Dict(entries) => ManagedValue::Dict(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.decode_any(v)))
                    .collect(),
            ),
            TaggedValue::Callback(id) => {
                ManagedValue::Callback(BoundCallback::new(*id, self.clone()))
            }
            TaggedValue::Entity(entity) => {
                match self.registry.get_or_create(entity.handle, entity.kind) {
                    Some(object) => ManagedValue::Entity(object),
                    None => ManagedValue::Nil,
                }
            }
            TaggedValue::Vector3(v) => ManagedValue::Vec3(*v),
            TaggedValue::Rgba(c) => ManagedValue::Rgba(*c),
        }
    }

    /// Symmetric encode path: packages a managed value back into a tagged
    /// value for call-forwarding and writes.
    #[must_use]
    pub fn encode(&self, value: &ManagedValue) -> TaggedValue {
        match value {
            ManagedValue::Nil => TaggedValue::Nil,
            ManagedValue::Bool(b) => TaggedValue::Bool(*b),
            ManagedValue::I8(v) => TaggedValue::Int(i64::from(*v)),
            ManagedValue::I16(v) => TaggedValue::Int(i64::from(*v)),
            ManagedValue::I32(v) => TaggedValue::Int(i64::from(*v)),
            ManagedValue::I64(v) => TaggedValue::Int(*v),
            ManagedValue::U8(v) => TaggedValue::Uint(u64::from(*v)),
            ManagedValue::U16(v) => TaggedValue::Uint(u64::from(*v)),
            ManagedValue::U32(v) => TaggedValue::Uint(u64::from(*v)),
            ManagedValue::U64(v) => TaggedValue::Uint(*v),
            ManagedValue::F32(v) => TaggedValue::Double(f64::from(*v)),
            ManagedValue::F64(v) => TaggedValue::Double(*v),
            ManagedValue::Str(s) => TaggedValue::Str(s.clone()),
            ManagedValue::Bytes(bytes) => TaggedValue::Bytes(bytes.clone()),
            ManagedValue::Vec3(v) => TaggedValue::Vector3(*v),
            ManagedValue::Rotation(r) => TaggedValue::Vector3((*r).into()),
            ManagedValue::Rgba(c) => TaggedValue::Rgba(*c),
            ManagedValue::List(items) => {
                TaggedValue::List(items.iter().map(|i| self.encode(i)).collect())
            }
            ManagedValue::Dict(entries) => TaggedValue::Dict(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.encode(v)))
                    .collect(),
            ),
            ManagedValue::Entity(object) => TaggedValue::Entity(hostbridge_types::EntityRef::new(
                object.handle(),
                object.kind(),
            )),
            ManagedValue::Callback(callback) => TaggedValue::Callback(callback.id()),
            ManagedValue::Enum(constant) => TaggedValue::Str(constant.name().to_owned()),
        }
    }
}

fn coerce_bool(value: &TaggedValue) -> ManagedValue {
    match value {
        TaggedValue::Bool(b) => ManagedValue::Bool(*b),
        TaggedValue::Str(s) => match s.as_str() {
            "true" => ManagedValue::Bool(true),
            "false" => ManagedValue::Bool(false),
            _ => ManagedValue::Nil,
        },
        _ => ManagedValue::Nil,
    }
}

fn coerce_str(value: &TaggedValue) -> ManagedValue {
    match value {
        TaggedValue::Int(i) => ManagedValue::Str(i.to_string()),
        TaggedValue::Uint(u) => ManagedValue::Str(u.to_string()),
        TaggedValue::Double(d) => ManagedValue::Str(d.to_string()),
        TaggedValue::Str(s) => ManagedValue::Str(s.clone()),
        TaggedValue::Bool(b) => ManagedValue::Str(if *b { "true" } else { "false" }.to_owned()),
        _ => ManagedValue::Nil,
    }
}

fn coerce_enum(value: &TaggedValue, decl: &Arc<EnumDecl>) -> ManagedValue {
    let Some(text) = value.as_str() else {
        return ManagedValue::Nil;
    };
    match decl.resolve(text) {
        Some(index) => ManagedValue::Enum(EnumValue::new(Arc::clone(decl), index)),
        None => ManagedValue::Nil,
    }
}

/// Default substituted for a null container slot: the configured default
/// was absent, so value types get their zero and everything else is Nil.
fn null_slot_default(ty: &TypeDesc) -> ManagedValue {
    if ty.is_value_type() {
        ty.zero_default()
    } else {
        ManagedValue::Nil
    }
}
