//! Runtime context for hostbridge.
//!
//! The embedder builds one [`HostContext`] per loaded resource and feeds
//! the host's lifecycle notifications through it:
//! - entity create/destroy entry points routed to the identity pools
//! - event payload normalization against declared signatures
//! - resource-unload teardown
//!
//! The context is an explicit value, not a process-wide singleton;
//! isolation between resources falls out of building one context each.

mod context;
mod error;
mod events;
mod trace;

pub use context::{HostContext, HostContextBuilder};
pub use error::RuntimeError;
pub use events::SignatureRegistry;
pub use trace::init_tracing;
