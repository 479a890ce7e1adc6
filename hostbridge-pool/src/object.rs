//! The canonical wrapper object for one native handle.

use hostbridge_types::{EntityKind, RawHandle};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared reference to a pool-owned wrapper.
///
/// Wrapper identity mirrors handle identity: the pool hands out clones of
/// one `Arc` per live handle, so `Arc::ptr_eq` answers "same entity".
pub type ObjectRef = Arc<GameObject>;

/// Canonical managed representation of one host-side entity.
///
/// Lifecycle: created lazily on first resolution of an unseen handle,
/// invalidated when the host signals destruction. An invalidated wrapper is
/// never handed out again; a reused raw handle gets a fresh wrapper.
pub struct GameObject {
    handle: RawHandle,
    kind: EntityKind,
    external_id: Option<u16>,
    valid: AtomicBool,
}

impl GameObject {
    /// Builds a fresh, valid wrapper. Factories call this; consumers only
    /// ever see pool-registered instances.
    #[must_use]
    pub fn new(handle: RawHandle, kind: EntityKind, external_id: Option<u16>) -> Self {
        Self {
            handle,
            kind,
            external_id,
            valid: AtomicBool::new(true),
        }
    }

    /// The native handle this wrapper stands for.
    #[must_use]
    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    /// The kind tag the handle was issued with.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Dense host-assigned identifier, for kinds that carry one.
    #[must_use]
    pub fn external_id(&self) -> Option<u16> {
        self.external_id
    }

    /// False once the host has signalled the underlying entity is gone.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    pub(crate) fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .field("external_id", &self.external_id)
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Constructs wrappers for one entity kind.
///
/// The hosting environment registers one factory per kind it uses; a pool
/// invokes it exactly once per unseen handle, under the pool lock.
pub trait ObjectFactory: Send + Sync {
    fn create(&self, handle: RawHandle, kind: EntityKind, external_id: Option<u16>) -> ObjectRef;
}

/// Default factory: a bare wrapper with no kind-specific state.
#[derive(Debug, Default)]
pub struct BaseFactory;

impl ObjectFactory for BaseFactory {
    fn create(&self, handle: RawHandle, kind: EntityKind, external_id: Option<u16>) -> ObjectRef {
        Arc::new(GameObject::new(handle, kind, external_id))
    }
}

impl<F> ObjectFactory for F
where
    F: Fn(RawHandle, EntityKind, Option<u16>) -> ObjectRef + Send + Sync,
{
    fn create(&self, handle: RawHandle, kind: EntityKind, external_id: Option<u16>) -> ObjectRef {
        self(handle, kind, external_id)
    }
}
