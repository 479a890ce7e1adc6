//! Tagged-value coercion engine for hostbridge.
//!
//! Converts dynamically tagged host values into strongly typed managed
//! values against a declared [`TypeDesc`]:
//! - best-effort, never-raising conversion (malformed host data resolves
//!   to defaults, not errors)
//! - two's-complement narrowing for numeric targets
//! - recursive container handling with a cached null-slot default
//! - entity references resolved through the identity pools
//! - callback handles bound into managed closures
//!
//! The engine is pure per call: the only state it carries is the pool
//! registry and the host's call-forwarding channel.

mod callback;
mod coerce;
mod descriptor;
mod record;
mod value;

pub use callback::{BoundCallback, HostInvoker};
pub use coerce::Marshaler;
pub use descriptor::{ElementDesc, EntityTarget, EnumDecl, TypeDesc};
pub use record::RecordDecode;
pub use value::{EnumValue, ManagedValue};
