//! Audio system
//!
//! Resolves sound names to clips, hands out transient playback channels for
//! one-shot and looping effects, and reclaims them without caller action.
//! Volume, mute and sfx flags live in [`VolumeState`] and are persisted
//! through a [`crate::config::ConfigStore`].

pub mod asset;
pub mod backend;
pub mod catalog;
pub mod manager;
pub mod music;
pub mod playback;
pub mod volume;

pub use asset::{AudioAsset, AudioFormat};
pub use backend::{AudioBackend, AudioBackendConfig, ChannelHandle};
pub use catalog::{CatalogManifest, SoundCatalog, SoundEntry, SoundSpec};
pub use manager::{PlayRequest, SoundManager};
pub use music::{BackgroundMusic, MusicState};
pub use playback::{PlaybackHandle, PlaybackKind, PlaybackState};
pub use volume::VolumeState;
pub use crate::foundation::collections::PlaybackId;

use crate::config::ConfigError;

/// Audio system errors
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// No catalog entry matches the requested name
    #[error("Sound not found: {0}")]
    SoundNotFound(String),

    /// Persisted settings could not be read
    #[error("Configuration unavailable: {0}")]
    ConfigurationUnavailable(#[from] ConfigError),

    /// Backend used before `initialize`
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Output device could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Decoding or sink creation failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Channel handle does not refer to an open channel
    #[error("Invalid channel handle")]
    InvalidHandle,

    /// Audio data could not be understood
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// IO error while reading audio files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
