//! Callback binding: host callback handles become managed closures.

use crate::coerce::Marshaler;
use crate::descriptor::TypeDesc;
use crate::value::ManagedValue;
use hostbridge_types::{CallbackId, TaggedValue};
use std::fmt;

/// The host's call-forwarding channel.
///
/// Supplied by the hosting environment; invoking a callback crosses back
/// into the host runtime with tagged arguments and returns a tagged result.
pub trait HostInvoker: Send + Sync {
    fn invoke(&self, callback: CallbackId, args: Vec<TaggedValue>) -> TaggedValue;
}

/// A managed closure wrapping one host callback handle.
///
/// Calling it packages the arguments back into tagged values through the
/// symmetric encode path, forwards them to the host, and loosely decodes
/// whatever comes back.
#[derive(Clone)]
pub struct BoundCallback {
    id: CallbackId,
    marshaler: Marshaler,
}

impl BoundCallback {
    pub(crate) fn new(id: CallbackId, marshaler: Marshaler) -> Self {
        Self { id, marshaler }
    }

    /// The host-side handle this closure forwards to.
    #[must_use]
    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Invokes the host callback with managed arguments.
    pub fn call(&self, args: &[ManagedValue]) -> ManagedValue {
        let tagged: Vec<TaggedValue> = args.iter().map(|a| self.marshaler.encode(a)).collect();
        let result = self.marshaler.invoker().invoke(self.id, tagged);
        self.marshaler.coerce(&result, &TypeDesc::Any)
    }
}

impl PartialEq for BoundCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for BoundCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundCallback").field(&self.id).finish()
    }
}
