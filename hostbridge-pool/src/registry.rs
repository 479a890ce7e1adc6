//! Kind-tag router over the per-kind sub-pools.

use crate::object::ObjectFactory;
use crate::pool::KindPool;
use crate::ObjectRef;
use hostbridge_types::{EntityKind, RawHandle};
use std::sync::Arc;
use tracing::warn;

/// Routes pool operations by the kind tag carried alongside a handle.
///
/// A fixed-size table, one slot per modeled kind. Kinds the hosting
/// environment never registered resolve to absent/false: the host may
/// reference entity kinds this resource does not use.
pub struct PoolRegistry {
    pools: [Option<KindPool>; EntityKind::COUNT],
}

impl PoolRegistry {
    /// Starts an empty registry builder.
    #[must_use]
    pub fn builder() -> PoolRegistryBuilder {
        PoolRegistryBuilder::default()
    }

    /// Borrows the sub-pool for a kind, if one was registered.
    #[must_use]
    pub fn pool(&self, kind: EntityKind) -> Option<&KindPool> {
        self.pools[kind.index()].as_ref()
    }

    /// Number of registered sub-pools.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.iter().filter(|p| p.is_some()).count()
    }

    /// Returns the existing wrapper for a handle; never creates.
    #[must_use]
    pub fn get(&self, handle: RawHandle, kind: EntityKind) -> Option<ObjectRef> {
        self.pool(kind)?.get(handle)
    }

    /// Resolves the canonical wrapper, creating it on first sight.
    /// Absent when no pool is registered for the kind.
    pub fn get_or_create(&self, handle: RawHandle, kind: EntityKind) -> Option<ObjectRef> {
        match self.pool(kind) {
            Some(pool) => Some(pool.get_or_create(handle)),
            None => {
                warn!(kind = %kind, %handle, "no pool registered for kind");
                None
            }
        }
    }

    /// Resolve with the host-assigned dense id. Kinds whose pool carries no
    /// index fall back to the id-less path.
    pub fn get_or_create_with_id(
        &self,
        handle: RawHandle,
        kind: EntityKind,
        external_id: u16,
    ) -> Option<ObjectRef> {
        match self.pool(kind) {
            Some(pool) => Some(pool.get_or_create_with_id(handle, external_id)),
            None => {
                warn!(kind = %kind, %handle, "no pool registered for kind");
                None
            }
        }
    }

    /// Deregisters and invalidates the wrapper for a handle.
    /// False when the kind has no pool or the handle is absent.
    pub fn remove(&self, handle: RawHandle, kind: EntityKind) -> bool {
        match self.pool(kind) {
            Some(pool) => pool.remove(handle),
            None => false,
        }
    }

    /// Clears every registered pool; used at resource unload.
    pub fn clear(&self) {
        for pool in self.pools.iter().flatten() {
            pool.clear();
        }
    }
}

/// Wires one factory per entity kind the hosting environment uses.
#[derive(Default)]
pub struct PoolRegistryBuilder {
    pools: Vec<KindPool>,
}

impl PoolRegistryBuilder {
    /// Registers a plain pool for a kind. Registering a kind twice keeps
    /// the last registration.
    #[must_use]
    pub fn register(mut self, kind: EntityKind, factory: Arc<dyn ObjectFactory>) -> Self {
        self.pools.retain(|p| p.kind() != kind);
        self.pools.push(KindPool::new(kind, factory));
        self
    }

    /// Registers a dense-indexed pool for a kind.
    #[must_use]
    pub fn register_indexed(mut self, kind: EntityKind, factory: Arc<dyn ObjectFactory>) -> Self {
        self.pools.retain(|p| p.kind() != kind);
        self.pools.push(KindPool::new_indexed(kind, factory));
        self
    }

    /// Builds the fixed dispatch table.
    #[must_use]
    pub fn build(self) -> PoolRegistry {
        let mut pools: [Option<KindPool>; EntityKind::COUNT] = std::array::from_fn(|_| None);
        for pool in self.pools {
            let index = pool.kind().index();
            pools[index] = Some(pool);
        }
        PoolRegistry { pools }
    }
}
