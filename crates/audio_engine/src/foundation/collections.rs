//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable key for a live playback in the sound manager's arena
    pub struct PlaybackId;
}

/// Arena owning values addressed by [`PlaybackId`]
///
/// Keys are generational: a key whose entry was removed never resolves again,
/// even after the slot is reused.
pub type PlaybackArena<T> = SlotMap<PlaybackId, T>;
