//! The explicitly constructed runtime context.
//!
//! One [`HostContext`] per loaded resource, built once at bootstrap and
//! threaded through by reference. There is no process-wide singleton;
//! embedders that need several isolated resources build several
//! contexts.

use crate::error::RuntimeError;
use hostbridge_marshal::{HostInvoker, ManagedValue, Marshaler, TypeDesc};
use hostbridge_pool::{ObjectFactory, ObjectRef, PoolRegistry};
use hostbridge_types::{CallbackId, EntityKind, RawHandle, TaggedValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runtime context: the pool registry plus the coercion engine wired to
/// the host's callback channel.
pub struct HostContext {
    registry: Arc<PoolRegistry>,
    marshaler: Marshaler,
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext").finish_non_exhaustive()
    }
}

impl HostContext {
    /// Starts an empty context builder.
    #[must_use]
    pub fn builder() -> HostContextBuilder {
        HostContextBuilder::default()
    }

    /// The shared entity pool registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// The coercion engine bound to this context.
    #[must_use]
    pub fn marshaler(&self) -> &Marshaler {
        &self.marshaler
    }

    /// Host created an entity: resolve its canonical wrapper.
    ///
    /// Absent when the kind has no registered pool; creation events for
    /// kinds this resource does not use are dropped, not errors.
    pub fn on_object_create(&self, handle: RawHandle, kind: EntityKind) -> Option<ObjectRef> {
        debug!(%handle, kind = %kind, "object create");
        self.registry.get_or_create(handle, kind)
    }

    /// Creation entry point carrying the host-assigned dense id.
    pub fn on_object_create_with_id(
        &self,
        handle: RawHandle,
        kind: EntityKind,
        external_id: u16,
    ) -> Option<ObjectRef> {
        debug!(%handle, kind = %kind, external_id, "object create");
        self.registry.get_or_create_with_id(handle, kind, external_id)
    }

    /// Host destroyed an entity: deregister and invalidate its wrapper.
    /// False when nothing was tracked for the handle.
    pub fn on_object_destroy(&self, handle: RawHandle, kind: EntityKind) -> bool {
        debug!(%handle, kind = %kind, "object destroy");
        self.registry.remove(handle, kind)
    }

    /// Normalizes an event payload against a declared parameter list.
    ///
    /// One output per declared parameter; missing trailing arguments
    /// coerce as Nil, surplus arguments are dropped.
    #[must_use]
    pub fn coerce_args(&self, args: &[TaggedValue], signature: &[TypeDesc]) -> Vec<ManagedValue> {
        coerce_with_signature(&self.marshaler, args, signature)
    }

    /// Resource-unload teardown: invalidates and drops every wrapper.
    pub fn shutdown(&self) {
        info!("host context shutting down");
        self.registry.clear();
    }
}

pub(crate) fn coerce_with_signature(
    marshaler: &Marshaler,
    args: &[TaggedValue],
    signature: &[TypeDesc],
) -> Vec<ManagedValue> {
    signature
        .iter()
        .enumerate()
        .map(|(i, desc)| marshaler.coerce(args.get(i).unwrap_or(&TaggedValue::Nil), desc))
        .collect()
}

/// Stands in when the embedder wires no callback channel. Calls through
/// it are logged and answered with Nil.
struct NoopInvoker;

impl HostInvoker for NoopInvoker {
    fn invoke(&self, callback: CallbackId, _args: Vec<TaggedValue>) -> TaggedValue {
        warn!(%callback, "callback invoked without a host invoker");
        TaggedValue::Nil
    }
}

/// Collects the host-supplied collaborators before the context exists:
/// one entity factory per kind the resource uses, and the callback
/// invoker.
#[derive(Default)]
pub struct HostContextBuilder {
    factories: Vec<(EntityKind, Arc<dyn ObjectFactory>, bool)>,
    invoker: Option<Arc<dyn HostInvoker>>,
}

impl HostContextBuilder {
    /// Registers an entity factory for a kind.
    #[must_use]
    pub fn factory(mut self, kind: EntityKind, factory: Arc<dyn ObjectFactory>) -> Self {
        self.factories.retain(|(k, _, _)| *k != kind);
        self.factories.push((kind, factory, false));
        self
    }

    /// Registers a factory for a kind the host assigns dense ids to.
    #[must_use]
    pub fn indexed_factory(mut self, kind: EntityKind, factory: Arc<dyn ObjectFactory>) -> Self {
        self.factories.retain(|(k, _, _)| *k != kind);
        self.factories.push((kind, factory, true));
        self
    }

    /// Wires the channel callback values are forwarded through.
    #[must_use]
    pub fn invoker(mut self, invoker: Arc<dyn HostInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Finalizes the context.
    ///
    /// A context without a single factory could never resolve an entity,
    /// so that is rejected here rather than silently at every lookup.
    pub fn build(self) -> Result<HostContext, RuntimeError> {
        if self.factories.is_empty() {
            return Err(RuntimeError::NoFactories);
        }

        let mut pools = PoolRegistry::builder();
        for (kind, factory, indexed) in self.factories {
            pools = if indexed {
                pools.register_indexed(kind, factory)
            } else {
                pools.register(kind, factory)
            };
        }
        let registry = Arc::new(pools.build());

        let invoker = self
            .invoker
            .unwrap_or_else(|| Arc::new(NoopInvoker) as Arc<dyn HostInvoker>);
        let marshaler = Marshaler::new(Arc::clone(&registry), invoker);

        info!(pools = registry.pool_count(), "host context ready");
        Ok(HostContext { registry, marshaler })
    }
}
