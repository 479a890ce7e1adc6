use hostbridge_marshal::{
    ElementDesc, EntityTarget, EnumDecl, HostInvoker, ManagedValue, Marshaler, RecordDecode,
    TypeDesc,
};
use hostbridge_pool::{BaseFactory, PoolRegistry};
use hostbridge_types::{
    CallbackId, EntityKind, EntityRef, RawHandle, Rgba, Rotation, TaggedValue, Vec3,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Invoker stub: records invocations, answers with a canned value.
struct StubInvoker {
    reply: TaggedValue,
    calls: Mutex<Vec<(CallbackId, Vec<TaggedValue>)>>,
}

impl StubInvoker {
    fn replying(reply: TaggedValue) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl HostInvoker for StubInvoker {
    fn invoke(&self, callback: CallbackId, args: Vec<TaggedValue>) -> TaggedValue {
        self.calls.lock().unwrap().push((callback, args));
        self.reply.clone()
    }
}

fn registry() -> Arc<PoolRegistry> {
    Arc::new(
        PoolRegistry::builder()
            .register_indexed(EntityKind::Player, Arc::new(BaseFactory))
            .register(EntityKind::Vehicle, Arc::new(BaseFactory))
            .build(),
    )
}

fn marshaler() -> Marshaler {
    Marshaler::new(registry(), StubInvoker::replying(TaggedValue::Nil))
}

// ── Bool target ──────────────────────────────────────────────────

#[test]
fn bool_accepts_bool_and_exact_literals() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Bool(true), &TypeDesc::Bool),
        ManagedValue::Bool(true)
    );
    assert_eq!(
        m.coerce(&"true".into(), &TypeDesc::Bool),
        ManagedValue::Bool(true)
    );
    assert_eq!(
        m.coerce(&"false".into(), &TypeDesc::Bool),
        ManagedValue::Bool(false)
    );
}

#[test]
fn bool_literal_match_is_case_sensitive() {
    let m = marshaler();
    assert_eq!(m.coerce(&"True".into(), &TypeDesc::Bool), ManagedValue::Nil);
    assert_eq!(m.coerce(&"FALSE".into(), &TypeDesc::Bool), ManagedValue::Nil);
    assert_eq!(m.coerce(&TaggedValue::Int(1), &TypeDesc::Bool), ManagedValue::Nil);
}

// ── Numeric targets ──────────────────────────────────────────────

#[test]
fn int_narrowing_wraps_like_twos_complement() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Int(300), &TypeDesc::I8),
        ManagedValue::I8(44)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Int(-1), &TypeDesc::U8),
        ManagedValue::U8(255)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Uint(u64::MAX), &TypeDesc::I64),
        ManagedValue::I64(-1)
    );
}

#[test]
fn double_truncates_toward_zero_then_wraps() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Double(42.9), &TypeDesc::I32),
        ManagedValue::I32(42)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Double(-1.5), &TypeDesc::U8),
        ManagedValue::U8(255)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Double(f64::NAN), &TypeDesc::I32),
        ManagedValue::I32(0)
    );
}

#[test]
fn int_from_string_parses_at_target_width() {
    let m = marshaler();
    assert_eq!(m.coerce(&"42".into(), &TypeDesc::I32), ManagedValue::I32(42));
    assert_eq!(m.coerce(&" -7 ".into(), &TypeDesc::I16), ManagedValue::I16(-7));
    // Out of range for the target width: parse failure, zero default.
    assert_eq!(m.coerce(&"300".into(), &TypeDesc::I8), ManagedValue::I8(0));
    assert_eq!(m.coerce(&"abc".into(), &TypeDesc::U32), ManagedValue::U32(0));
}

#[test]
fn int_from_bool_is_one_or_zero() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Bool(true), &TypeDesc::U16),
        ManagedValue::U16(1)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Bool(false), &TypeDesc::I64),
        ManagedValue::I64(0)
    );
}

#[test]
fn int_from_incompatible_variant_is_zero() {
    let m = marshaler();
    assert_eq!(m.coerce(&TaggedValue::Nil, &TypeDesc::I32), ManagedValue::I32(0));
    assert_eq!(
        m.coerce(&TaggedValue::List(vec![]), &TypeDesc::U64),
        ManagedValue::U64(0)
    );
}

#[test]
fn float_targets_convert_and_parse() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Int(-3), &TypeDesc::F64),
        ManagedValue::F64(-3.0)
    );
    assert_eq!(
        m.coerce(&"1.5".into(), &TypeDesc::F32),
        ManagedValue::F32(1.5)
    );
    assert_eq!(
        m.coerce(&"not a number".into(), &TypeDesc::F64),
        ManagedValue::F64(0.0)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Bool(true), &TypeDesc::F32),
        ManagedValue::F32(1.0)
    );
}

// ── String target ────────────────────────────────────────────────

#[test]
fn string_formats_numbers_invariantly() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Int(-1234567), &TypeDesc::Str),
        ManagedValue::Str("-1234567".into())
    );
    assert_eq!(
        m.coerce(&TaggedValue::Uint(42), &TypeDesc::Str),
        ManagedValue::Str("42".into())
    );
    assert_eq!(
        m.coerce(&TaggedValue::Double(1.5), &TypeDesc::Str),
        ManagedValue::Str("1.5".into())
    );
}

#[test]
fn string_formats_bools_lowercase() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Bool(true), &TypeDesc::Str),
        ManagedValue::Str("true".into())
    );
    assert_eq!(
        m.coerce(&TaggedValue::Bool(false), &TypeDesc::Str),
        ManagedValue::Str("false".into())
    );
}

#[test]
fn string_passes_through_and_rejects_composites() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&"hello".into(), &TypeDesc::Str),
        ManagedValue::Str("hello".into())
    );
    assert_eq!(m.coerce(&TaggedValue::List(vec![]), &TypeDesc::Str), ManagedValue::Nil);
    assert_eq!(m.coerce(&TaggedValue::Nil, &TypeDesc::Str), ManagedValue::Nil);
}

// ── Sequence target ──────────────────────────────────────────────

#[test]
fn list_coerces_each_element_recursively() {
    let m = marshaler();
    // [1, null, "2", true] against i32 elements -> [1, 0, 2, 1]
    let input = TaggedValue::List(vec![
        TaggedValue::Int(1),
        TaggedValue::Nil,
        "2".into(),
        TaggedValue::Bool(true),
    ]);
    assert_eq!(
        m.coerce(&input, &TypeDesc::list(TypeDesc::I32)),
        ManagedValue::List(vec![
            ManagedValue::I32(1),
            ManagedValue::I32(0),
            ManagedValue::I32(2),
            ManagedValue::I32(1),
        ])
    );
}

#[test]
fn list_length_is_preserved() {
    let m = marshaler();
    let input = TaggedValue::List(vec![TaggedValue::Nil; 5]);
    let out = m.coerce(&input, &TypeDesc::list(TypeDesc::U8));
    assert_eq!(out.as_list().unwrap().len(), 5);
}

#[test]
fn list_rejects_non_sequence_sources() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Int(1), &TypeDesc::list(TypeDesc::I32)),
        ManagedValue::Nil
    );
}

#[test]
fn list_null_slots_use_configured_default() {
    let m = marshaler();
    let desc = TypeDesc::List(Box::new(ElementDesc::with_default(
        TypeDesc::I32,
        ManagedValue::I32(-1),
    )));
    let input = TaggedValue::List(vec![TaggedValue::Nil, TaggedValue::Int(7), TaggedValue::Nil]);
    assert_eq!(
        m.coerce(&input, &desc),
        ManagedValue::List(vec![
            ManagedValue::I32(-1),
            ManagedValue::I32(7),
            ManagedValue::I32(-1),
        ])
    );
}

#[test]
fn list_null_slots_of_reference_elements_stay_nil() {
    let m = marshaler();
    let desc = TypeDesc::list(TypeDesc::list(TypeDesc::I32));
    let input = TaggedValue::List(vec![TaggedValue::Nil]);
    assert_eq!(
        m.coerce(&input, &desc),
        ManagedValue::List(vec![ManagedValue::Nil])
    );
}

#[test]
fn string_list_fast_path_accepts_only_strings_or_null() {
    let m = marshaler();
    let input = TaggedValue::List(vec![
        "a".into(),
        TaggedValue::Nil,
        TaggedValue::Int(5),
        "b".into(),
    ]);
    assert_eq!(
        m.coerce(&input, &TypeDesc::list(TypeDesc::Str)),
        ManagedValue::List(vec![
            ManagedValue::Str("a".into()),
            ManagedValue::Nil,
            ManagedValue::Nil,
            ManagedValue::Str("b".into()),
        ])
    );
}

// ── Map target ───────────────────────────────────────────────────

#[test]
fn dict_coerces_values_and_keeps_keys() {
    let m = marshaler();
    let mut entries = HashMap::new();
    entries.insert("a".to_owned(), TaggedValue::Int(1));
    entries.insert("b".to_owned(), TaggedValue::Nil);
    entries.insert("c".to_owned(), "3".into());
    let out = m.coerce(&TaggedValue::Dict(entries), &TypeDesc::dict(TypeDesc::I32));

    let mut expected = HashMap::new();
    expected.insert("a".to_owned(), ManagedValue::I32(1));
    expected.insert("b".to_owned(), ManagedValue::I32(0));
    expected.insert("c".to_owned(), ManagedValue::I32(3));
    assert_eq!(out, ManagedValue::Dict(expected));
}

#[test]
fn dict_rejects_non_string_key_type() {
    let m = marshaler();
    let desc = TypeDesc::Dict {
        key: Box::new(TypeDesc::I32),
        value: Box::new(ElementDesc::of(TypeDesc::I32)),
    };
    let out = m.coerce(&TaggedValue::Dict(HashMap::new()), &desc);
    assert_eq!(out, ManagedValue::Nil);
}

#[test]
fn dict_rejects_non_dict_sources() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::List(vec![]), &TypeDesc::dict(TypeDesc::I32)),
        ManagedValue::Nil
    );
}

// ── Entity target ────────────────────────────────────────────────

#[test]
fn entity_resolves_through_the_pool() {
    let reg = registry();
    let m = Marshaler::new(Arc::clone(&reg), StubInvoker::replying(TaggedValue::Nil));
    let entity = EntityRef::new(RawHandle::new(9), EntityKind::Player);

    let out = m.coerce(
        &TaggedValue::Entity(entity),
        &TypeDesc::Entity(EntityTarget::Kind(EntityKind::Player)),
    );
    let object = out.as_entity().unwrap();
    let pooled = reg.get(RawHandle::new(9), EntityKind::Player).unwrap();
    assert!(Arc::ptr_eq(object, &pooled));
}

#[test]
fn entity_resolution_is_identity_stable() {
    let m = marshaler();
    let entity = TaggedValue::Entity(EntityRef::new(RawHandle::new(9), EntityKind::Player));
    let desc = TypeDesc::Entity(EntityTarget::Any);

    let first = m.coerce(&entity, &desc);
    let second = m.coerce(&entity, &desc);
    assert!(Arc::ptr_eq(
        first.as_entity().unwrap(),
        second.as_entity().unwrap()
    ));
}

#[test]
fn entity_kind_mismatch_yields_nil() {
    let m = marshaler();
    let entity = TaggedValue::Entity(EntityRef::new(RawHandle::new(9), EntityKind::Player));
    let out = m.coerce(
        &entity,
        &TypeDesc::Entity(EntityTarget::Kind(EntityKind::Vehicle)),
    );
    assert_eq!(out, ManagedValue::Nil);
}

#[test]
fn entity_with_unregistered_kind_yields_nil() {
    let m = marshaler();
    let entity = TaggedValue::Entity(EntityRef::new(RawHandle::new(9), EntityKind::WebView));
    let out = m.coerce(&entity, &TypeDesc::Entity(EntityTarget::Any));
    assert_eq!(out, ManagedValue::Nil);
}

#[test]
fn entity_rejects_non_entity_variants() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Int(9), &TypeDesc::Entity(EntityTarget::Any)),
        ManagedValue::Nil
    );
}

// ── Enum target ──────────────────────────────────────────────────

fn state_enum() -> Arc<EnumDecl> {
    Arc::new(EnumDecl::new("GameState", ["Active", "Paused", "Stopped"]))
}

#[test]
fn enum_matches_case_insensitively() {
    let m = marshaler();
    let desc = TypeDesc::Enum(state_enum());

    let upper = m.coerce(&"ACTIVE".into(), &desc);
    let lower = m.coerce(&"active".into(), &desc);
    assert_eq!(upper, lower);

    match upper {
        ManagedValue::Enum(constant) => {
            assert_eq!(constant.index(), 0);
            assert_eq!(constant.name(), "Active");
        }
        other => panic!("expected enum, got {other:?}"),
    }
}

#[test]
fn enum_unmatched_or_non_string_yields_nil() {
    let m = marshaler();
    let desc = TypeDesc::Enum(state_enum());
    assert_eq!(m.coerce(&"nonexistent".into(), &desc), ManagedValue::Nil);
    assert_eq!(m.coerce(&TaggedValue::Int(0), &desc), ManagedValue::Nil);
}

// ── Domain value targets ─────────────────────────────────────────

#[test]
fn domain_types_accept_only_their_pretyped_variant() {
    let m = marshaler();
    let v = Vec3::new(1.0, 2.0, 3.0);

    assert_eq!(
        m.coerce(&TaggedValue::Vector3(v), &TypeDesc::Vec3),
        ManagedValue::Vec3(v)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Int(1), &TypeDesc::Vec3),
        ManagedValue::Vec3(Vec3::ZERO)
    );

    assert_eq!(
        m.coerce(&TaggedValue::Vector3(v), &TypeDesc::Rotation),
        ManagedValue::Rotation(Rotation::new(1.0, 2.0, 3.0))
    );
    assert_eq!(
        m.coerce(&"x".into(), &TypeDesc::Rotation),
        ManagedValue::Rotation(Rotation::ZERO)
    );

    let c = Rgba::new(10, 20, 30, 40);
    assert_eq!(
        m.coerce(&TaggedValue::Rgba(c), &TypeDesc::Rgba),
        ManagedValue::Rgba(c)
    );
    assert_eq!(
        m.coerce(&TaggedValue::Nil, &TypeDesc::Rgba),
        ManagedValue::Rgba(Rgba::ZERO)
    );
}

#[test]
fn bytes_accept_only_the_bytes_variant() {
    let m = marshaler();
    assert_eq!(
        m.coerce(&TaggedValue::Bytes(vec![1, 2, 3]), &TypeDesc::Bytes),
        ManagedValue::Bytes(vec![1, 2, 3])
    );
    assert_eq!(m.coerce(&"abc".into(), &TypeDesc::Bytes), ManagedValue::Nil);
}

// ── Callback target ──────────────────────────────────────────────

#[test]
fn callback_binds_and_forwards_encoded_args() {
    let invoker = StubInvoker::replying(TaggedValue::Int(99));
    let m = Marshaler::new(registry(), Arc::clone(&invoker) as Arc<dyn HostInvoker>);

    let out = m.coerce(&TaggedValue::Callback(CallbackId::new(5)), &TypeDesc::Callback);
    let ManagedValue::Callback(bound) = out else {
        panic!("expected callback");
    };
    assert_eq!(bound.id(), CallbackId::new(5));

    let result = bound.call(&[ManagedValue::I32(7), ManagedValue::Str("hi".into())]);
    assert_eq!(result, ManagedValue::I64(99));

    let calls = invoker.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, CallbackId::new(5));
    assert_eq!(
        calls[0].1,
        vec![TaggedValue::Int(7), TaggedValue::Str("hi".into())]
    );
}

#[test]
fn callback_rejects_other_variants() {
    let m = marshaler();
    assert_eq!(m.coerce(&TaggedValue::Int(5), &TypeDesc::Callback), ManagedValue::Nil);
}

// ── Convertible record fallback ──────────────────────────────────

/// Decoder for a {x, y, z} record, standing in for an opaque target type.
struct PointDecoder;

impl RecordDecode for PointDecoder {
    fn type_name(&self) -> &'static str {
        "Point"
    }

    fn decode(&self, record: &serde_json::Value) -> Option<ManagedValue> {
        let x = record.get("x")?.as_f64()? as f32;
        let y = record.get("y")?.as_f64()? as f32;
        let z = record.get("z")?.as_f64()? as f32;
        Some(ManagedValue::Vec3(Vec3::new(x, y, z)))
    }
}

#[test]
fn record_fallback_decodes_from_dict() {
    let m = marshaler();
    let mut entries = HashMap::new();
    entries.insert("x".to_owned(), TaggedValue::Double(1.0));
    entries.insert("y".to_owned(), TaggedValue::Double(2.0));
    entries.insert("z".to_owned(), TaggedValue::Double(3.0));

    let out = m.coerce(
        &TaggedValue::Dict(entries),
        &TypeDesc::Record(Arc::new(PointDecoder)),
    );
    assert_eq!(out, ManagedValue::Vec3(Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn record_fallback_decode_failure_yields_nil() {
    let m = marshaler();
    let mut entries = HashMap::new();
    entries.insert("x".to_owned(), TaggedValue::Double(1.0));

    let out = m.coerce(
        &TaggedValue::Dict(entries),
        &TypeDesc::Record(Arc::new(PointDecoder)),
    );
    assert_eq!(out, ManagedValue::Nil);
}

#[test]
fn record_fallback_requires_a_dict_source() {
    let m = marshaler();
    let out = m.coerce(&TaggedValue::Int(1), &TypeDesc::Record(Arc::new(PointDecoder)));
    assert_eq!(out, ManagedValue::Nil);
}

// ── Any target and the symmetric encode path ─────────────────────

#[test]
fn any_keeps_the_source_shape() {
    let m = marshaler();
    let input = TaggedValue::List(vec![
        TaggedValue::Int(-1),
        TaggedValue::Uint(1),
        TaggedValue::Double(1.5),
        "s".into(),
    ]);
    assert_eq!(
        m.coerce(&input, &TypeDesc::Any),
        ManagedValue::List(vec![
            ManagedValue::I64(-1),
            ManagedValue::U64(1),
            ManagedValue::F64(1.5),
            ManagedValue::Str("s".into()),
        ])
    );
}

#[test]
fn encode_is_symmetric_for_plain_values() {
    let m = marshaler();
    let values = [
        ManagedValue::Nil,
        ManagedValue::Bool(true),
        ManagedValue::I64(-5),
        ManagedValue::U64(5),
        ManagedValue::F64(2.5),
        ManagedValue::Str("s".into()),
        ManagedValue::Bytes(vec![1, 2]),
        ManagedValue::Vec3(Vec3::new(1.0, 2.0, 3.0)),
    ];
    for value in values {
        let round = m.coerce(&m.encode(&value), &TypeDesc::Any);
        assert_eq!(round, value);
    }
}

#[test]
fn encode_widens_narrow_integers() {
    let m = marshaler();
    assert_eq!(m.encode(&ManagedValue::I8(-3)), TaggedValue::Int(-3));
    assert_eq!(m.encode(&ManagedValue::U16(9)), TaggedValue::Uint(9));
}

#[test]
fn encode_maps_rotation_back_to_vector() {
    let m = marshaler();
    assert_eq!(
        m.encode(&ManagedValue::Rotation(Rotation::new(1.0, 2.0, 3.0))),
        TaggedValue::Vector3(Vec3::new(1.0, 2.0, 3.0))
    );
}

#[test]
fn encode_enum_uses_canonical_variant_name() {
    let m = marshaler();
    let out = m.coerce(&"paused".into(), &TypeDesc::Enum(state_enum()));
    assert_eq!(m.encode(&out), TaggedValue::Str("Paused".into()));
}

#[test]
fn encode_entity_carries_handle_and_kind() {
    let m = marshaler();
    let entity = TaggedValue::Entity(EntityRef::new(RawHandle::new(4), EntityKind::Player));
    let resolved = m.coerce(&entity, &TypeDesc::Entity(EntityTarget::Any));
    assert_eq!(m.encode(&resolved), entity);
}
