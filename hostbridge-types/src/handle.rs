//! Handle and kind-tag types issued by the host runtime.
//!
//! The host hands out a raw handle plus a kind tag whenever an entity is
//! created, destroyed, or referenced. Handles are stable identity tokens
//! for the lifetime of the underlying entity; equality is raw-value
//! equality, nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque native reference to one host-side entity.
///
/// The pool layer guarantees at most one live wrapper per handle; this type
/// only carries the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawHandle(u64);

impl RawHandle {
    /// Creates a handle from the host-issued raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the underlying raw value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Handle to a host-side callback function.
///
/// Only meaningful to the host's call-forwarding channel; the managed side
/// treats it as an identity token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackId(u64);

impl CallbackId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback:{}", self.0)
    }
}

/// Errors raised when interpreting host-issued tags.
#[derive(Debug, thiserror::Error)]
pub enum KindError {
    #[error("unknown entity kind tag: {0}")]
    UnknownTag(u8),
}

/// Closed enumeration of entity categories the managed side models.
///
/// The raw tag values match what the host sends; tags outside this set are
/// rejected at the boundary via [`EntityKind::try_from`] rather than
/// surfacing as a panic deeper in.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player = 0,
    Vehicle = 1,
    Blip = 2,
    Checkpoint = 3,
    VoiceChannel = 4,
    ColShape = 5,
    Audio = 6,
    WebView = 7,
}

impl EntityKind {
    /// Number of modeled kinds; sized for fixed dispatch tables.
    pub const COUNT: usize = 8;

    /// All modeled kinds, in tag order.
    pub const ALL: [EntityKind; Self::COUNT] = [
        EntityKind::Player,
        EntityKind::Vehicle,
        EntityKind::Blip,
        EntityKind::Checkpoint,
        EntityKind::VoiceChannel,
        EntityKind::ColShape,
        EntityKind::Audio,
        EntityKind::WebView,
    ];

    /// Returns the kind's position in a fixed dispatch table.
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the raw tag value as the host encodes it.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        *self as u8
    }

    /// Human-readable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Blip => "blip",
            EntityKind::Checkpoint => "checkpoint",
            EntityKind::VoiceChannel => "voice-channel",
            EntityKind::ColShape => "col-shape",
            EntityKind::Audio => "audio",
            EntityKind::WebView => "web-view",
        }
    }
}

impl TryFrom<u8> for EntityKind {
    type Error = KindError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(EntityKind::Player),
            1 => Ok(EntityKind::Vehicle),
            2 => Ok(EntityKind::Blip),
            3 => Ok(EntityKind::Checkpoint),
            4 => Ok(EntityKind::VoiceChannel),
            5 => Ok(EntityKind::ColShape),
            6 => Ok(EntityKind::Audio),
            7 => Ok(EntityKind::WebView),
            other => Err(KindError::UnknownTag(other)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A kind-tagged handle: what an entity reference looks like inside a
/// tagged value before the pool resolves it to a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub handle: RawHandle,
    pub kind: EntityKind,
}

impl EntityRef {
    #[must_use]
    pub const fn new(handle: RawHandle, kind: EntityKind) -> Self {
        Self { handle, kind }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.handle)
    }
}
