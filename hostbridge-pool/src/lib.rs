//! Entity identity pools for hostbridge.
//!
//! The host issues raw handles; this crate guarantees that each live
//! (handle, kind) pair maps to exactly one shared wrapper object:
//! - `KindPool`: get-or-create with memoized identity for a single kind
//! - `PoolRegistry`: fixed-size router from kind tag to sub-pool
//!
//! Unknown or unregistered kinds resolve to absent/false, never an error —
//! the host may ship entity kinds this side does not model yet.

mod object;
mod pool;
mod registry;

pub use object::{BaseFactory, GameObject, ObjectFactory, ObjectRef};
pub use pool::KindPool;
pub use registry::{PoolRegistry, PoolRegistryBuilder};
