//! One identity pool per entity kind.

use crate::object::{ObjectFactory, ObjectRef};
use hostbridge_types::{EntityKind, RawHandle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Default)]
struct PoolState {
    entries: HashMap<RawHandle, ObjectRef>,
    /// Dense external-id index, populated only for indexed pools.
    by_id: HashMap<u16, RawHandle>,
}

/// Identity pool for a single entity kind.
///
/// Upholds the central invariant: at most one live wrapper per handle.
/// Both maps sit behind one mutex and the factory runs while it is held,
/// so two racing `get_or_create` calls for the same handle cannot both
/// construct a wrapper.
pub struct KindPool {
    kind: EntityKind,
    factory: Arc<dyn ObjectFactory>,
    indexed: bool,
    state: Mutex<PoolState>,
}

impl KindPool {
    /// Creates a pool without a dense-id index.
    #[must_use]
    pub fn new(kind: EntityKind, factory: Arc<dyn ObjectFactory>) -> Self {
        Self {
            kind,
            factory,
            indexed: false,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Creates a pool that additionally indexes wrappers by the small
    /// host-assigned identifier (players, vehicles).
    #[must_use]
    pub fn new_indexed(kind: EntityKind, factory: Arc<dyn ObjectFactory>) -> Self {
        Self {
            kind,
            factory,
            indexed: true,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// The kind this pool serves.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Whether this pool maintains the dense external-id index.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Returns the existing wrapper for a handle, never creating one.
    #[must_use]
    pub fn get(&self, handle: RawHandle) -> Option<ObjectRef> {
        let state = self.state.lock().expect("pool lock poisoned");
        state.entries.get(&handle).cloned()
    }

    /// Returns the canonical wrapper for a handle, constructing and
    /// registering it on first sight.
    pub fn get_or_create(&self, handle: RawHandle) -> ObjectRef {
        self.resolve(handle, None)
    }

    /// `get_or_create` variant for kinds whose entities also carry a dense
    /// host-assigned id. Non-indexed pools ignore the id.
    pub fn get_or_create_with_id(&self, handle: RawHandle, external_id: u16) -> ObjectRef {
        let id = self.indexed.then_some(external_id);
        self.resolve(handle, id)
    }

    fn resolve(&self, handle: RawHandle, external_id: Option<u16>) -> ObjectRef {
        let mut state = self.state.lock().expect("pool lock poisoned");
        if let Some(existing) = state.entries.get(&handle) {
            return Arc::clone(existing);
        }

        let object = self.factory.create(handle, self.kind, external_id);
        state.entries.insert(handle, Arc::clone(&object));
        if let Some(id) = external_id {
            state.by_id.insert(id, handle);
        }
        debug!(kind = %self.kind, %handle, external_id, "wrapper registered");
        object
    }

    /// Dense-index lookup; always absent for non-indexed pools.
    #[must_use]
    pub fn get_by_external_id(&self, external_id: u16) -> Option<ObjectRef> {
        let state = self.state.lock().expect("pool lock poisoned");
        let handle = state.by_id.get(&external_id)?;
        state.entries.get(handle).cloned()
    }

    /// Invalidates and deregisters the wrapper for a handle.
    ///
    /// Idempotent: removing an absent handle returns false. A subsequent
    /// `get_or_create` for the same raw handle builds a fresh wrapper —
    /// invalidated wrappers are never resurrected.
    pub fn remove(&self, handle: RawHandle) -> bool {
        let mut state = self.state.lock().expect("pool lock poisoned");
        let Some(object) = state.entries.remove(&handle) else {
            return false;
        };
        object.invalidate();
        if let Some(id) = object.external_id() {
            state.by_id.remove(&id);
        }
        debug!(kind = %self.kind, %handle, "wrapper removed");
        true
    }

    /// Invalidates and drops every wrapper; used at resource unload.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("pool lock poisoned");
        for object in state.entries.values() {
            object.invalidate();
        }
        let count = state.entries.len();
        state.entries.clear();
        state.by_id.clear();
        debug!(kind = %self.kind, count, "pool cleared");
    }

    /// Number of live wrappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().expect("pool lock poisoned").entries.len()
    }

    /// True when no wrapper is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all live wrappers, in no particular order.
    #[must_use]
    pub fn all(&self) -> Vec<ObjectRef> {
        let state = self.state.lock().expect("pool lock poisoned");
        state.entries.values().cloned().collect()
    }
}
