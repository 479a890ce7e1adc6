//! Self-describing record fallback for directly-constructible targets.

use crate::value::ManagedValue;
use hostbridge_types::TaggedValue;
use serde_json::{Map, Number, Value};

/// Decode hook for target types that declare themselves directly
/// constructible from a tagged value.
///
/// The engine hands the decoder a self-describing JSON record built from
/// the source dict; the record lives only for the duration of the call.
/// Returning `None` resolves the coercion to Nil.
pub trait RecordDecode: Send + Sync {
    /// Diagnostic name of the target type.
    fn type_name(&self) -> &'static str;

    fn decode(&self, record: &Value) -> Option<ManagedValue>;
}

/// Re-encodes a tagged value into a self-describing record.
///
/// Structure-preserving: dicts become objects, lists arrays, numbers keep
/// their numeric class. Entities keep enough identity to be re-resolved;
/// callback handles carry no decodable payload and become null.
pub(crate) fn to_record(value: &TaggedValue) -> Value {
    match value {
        TaggedValue::Nil => Value::Null,
        TaggedValue::Bool(b) => Value::Bool(*b),
        TaggedValue::Int(i) => Value::Number((*i).into()),
        TaggedValue::Uint(u) => Value::Number((*u).into()),
        TaggedValue::Double(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
        TaggedValue::Str(s) => Value::String(s.clone()),
        TaggedValue::Bytes(bytes) => {
            Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
        }
        TaggedValue::List(items) => Value::Array(items.iter().map(to_record).collect()),
        TaggedValue::Dict(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                object.insert(key.clone(), to_record(entry));
            }
            Value::Object(object)
        }
        TaggedValue::Callback(_) => Value::Null,
        TaggedValue::Entity(entity) => {
            let mut object = Map::with_capacity(2);
            object.insert("kind".into(), Value::String(entity.kind.name().into()));
            object.insert("handle".into(), Value::Number(entity.handle.as_u64().into()));
            Value::Object(object)
        }
        TaggedValue::Vector3(v) => {
            let mut object = Map::with_capacity(3);
            object.insert("x".into(), float_field(v.x));
            object.insert("y".into(), float_field(v.y));
            object.insert("z".into(), float_field(v.z));
            Value::Object(object)
        }
        TaggedValue::Rgba(c) => {
            let mut object = Map::with_capacity(4);
            object.insert("r".into(), Value::Number(c.r.into()));
            object.insert("g".into(), Value::Number(c.g.into()));
            object.insert("b".into(), Value::Number(c.b.into()));
            object.insert("a".into(), Value::Number(c.a.into()));
            Value::Object(object)
        }
    }
}

fn float_field(v: f32) -> Value {
    Number::from_f64(f64::from(v)).map_or(Value::Null, Value::Number)
}
