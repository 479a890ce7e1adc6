//! Core type definitions for hostbridge.
//!
//! This crate defines the fundamental, host-agnostic types that cross the
//! native boundary:
//! - Raw entity handles and kind tags
//! - The dynamically tagged value (`TaggedValue`) the host emits for
//!   arguments, event payloads, and field reads
//! - Pre-typed math values (position, rotation, color)
//!
//! Everything that interprets these values (coercion rules, wrapper pools)
//! lives in the downstream crates, not here.

mod handle;
mod math;
mod value;

pub use handle::{CallbackId, EntityKind, EntityRef, KindError, RawHandle};
pub use math::{Rgba, Rotation, Vec3};
pub use value::TaggedValue;
