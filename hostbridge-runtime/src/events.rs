//! Named event signatures.
//!
//! Script events arrive as a name plus a raw payload; the embedder
//! declares a parameter list per event name once, and every later
//! payload is normalized against it.

use crate::context::coerce_with_signature;
use hostbridge_marshal::{ManagedValue, Marshaler, TypeDesc};
use hostbridge_types::TaggedValue;
use std::collections::HashMap;
use tracing::debug;

/// Maps event names to declared parameter lists, bound to one context's
/// coercion engine.
pub struct SignatureRegistry {
    marshaler: Marshaler,
    signatures: HashMap<String, Vec<TypeDesc>>,
}

impl SignatureRegistry {
    #[must_use]
    pub fn new(marshaler: Marshaler) -> Self {
        Self {
            marshaler,
            signatures: HashMap::new(),
        }
    }

    /// Declares the parameter list for an event name. Re-declaring a name
    /// replaces the previous signature.
    pub fn register(&mut self, name: impl Into<String>, signature: Vec<TypeDesc>) {
        let name = name.into();
        debug!(event = %name, params = signature.len(), "event signature registered");
        self.signatures.insert(name, signature);
    }

    /// The declared parameter list for an event, if any.
    #[must_use]
    pub fn signature(&self, name: &str) -> Option<&[TypeDesc]> {
        self.signatures.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Normalizes an event payload against the event's declared signature.
    ///
    /// `None` for undeclared events; missing trailing arguments coerce as
    /// Nil and surplus arguments are dropped, same as direct argument
    /// coercion.
    #[must_use]
    pub fn coerce_event(&self, name: &str, args: &[TaggedValue]) -> Option<Vec<ManagedValue>> {
        let signature = self.signatures.get(name)?;
        Some(coerce_with_signature(&self.marshaler, args, signature))
    }
}
