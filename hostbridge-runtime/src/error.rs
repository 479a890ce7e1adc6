use thiserror::Error;

/// Fatal configuration errors raised while building the host context.
///
/// Everything past bootstrap is total: malformed values coerce to
/// defaults and unknown kinds resolve to absent, so runtime operations
/// never surface an error type.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The builder was finalized without a single entity factory.
    #[error("no entity factories registered; the context would never resolve an entity")]
    NoFactories,
}
