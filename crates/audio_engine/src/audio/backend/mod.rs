//! Audio backend implementations
//!
//! Platform-independent abstraction over audio output. A backend owns a set
//! of channels; each channel plays one clip at a time and carries its own
//! volume, pitch and mute state.

pub mod headless;
pub mod rodio_backend;

pub use headless::HeadlessBackend;
pub use rodio_backend::RodioBackend;

use crate::audio::{AudioAsset, AudioError};

/// Handle to an output channel owned by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle {
    /// Unique identifier for the channel
    pub id: u32,
    /// Generation counter for handle validation
    pub generation: u32,
}

impl ChannelHandle {
    /// Create a new channel handle
    pub fn new(id: u32, generation: u32) -> Self {
        Self { id, generation }
    }
}

/// Reject playback speeds a resampler cannot handle
///
/// A pitch must be finite and above zero; anything else would scale the
/// source sample rate down to zero.
pub fn validate_pitch(pitch: f32) -> Result<(), AudioError> {
    if pitch.is_finite() && pitch > 0.0 {
        Ok(())
    } else {
        Err(AudioError::PlaybackFailed(format!("Invalid pitch: {}", pitch)))
    }
}

/// Audio backend trait for platform abstraction
///
/// Not `Send + Sync`: all calls come from the single cooperative scheduler
/// thread that drives the sound manager.
pub trait AudioBackend {
    /// Initialize the audio backend
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError>;
    
    /// Shutdown the audio backend
    fn shutdown(&mut self);
    
    /// Check if backend is initialized
    fn is_initialized(&self) -> bool;
    
    /// Per-tick housekeeping (release resources of finished channels)
    fn update(&mut self);

    /// Allocate a fresh, idle channel
    fn open_channel(&mut self) -> Result<ChannelHandle, AudioError>;

    /// Stop a channel and release it; unknown handles are ignored
    fn close_channel(&mut self, channel: ChannelHandle);

    /// Start `asset` on `channel`, replacing whatever it was playing
    fn play(
        &mut self,
        channel: ChannelHandle,
        asset: &AudioAsset,
        looping: bool,
    ) -> Result<(), AudioError>;

    /// Stop a channel without releasing it
    fn stop(&mut self, channel: ChannelHandle) -> Result<(), AudioError>;
    
    /// Set volume of a channel
    fn set_volume(&mut self, channel: ChannelHandle, volume: f32) -> Result<(), AudioError>;
    
    /// Get volume of a channel
    fn volume(&self, channel: ChannelHandle) -> Result<f32, AudioError>;

    /// Set playback speed of a channel (1.0 = normal)
    ///
    /// Fails with `PlaybackFailed` unless `pitch` passes [`validate_pitch`].
    fn set_pitch(&mut self, channel: ChannelHandle, pitch: f32) -> Result<(), AudioError>;

    /// Get playback speed of a channel
    fn pitch(&self, channel: ChannelHandle) -> Result<f32, AudioError>;

    /// Silence a channel without stopping it
    fn set_muted(&mut self, channel: ChannelHandle, muted: bool) -> Result<(), AudioError>;

    /// Check if a channel is muted
    fn is_muted(&self, channel: ChannelHandle) -> Result<bool, AudioError>;
    
    /// Check if a channel is producing audio
    fn is_playing(&self, channel: ChannelHandle) -> bool;

    /// Number of open channels
    fn channel_count(&self) -> usize;
}

/// Configuration for audio backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Sample rate (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of output channels (1=mono, 2=stereo)
    pub channels: u16,
    /// Buffer size for audio processing
    pub buffer_size: usize,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            buffer_size: 4096,
        }
    }
}

/// Create the default audio backend for the platform
pub fn create_backend(config: &AudioBackendConfig) -> Result<Box<dyn AudioBackend>, AudioError> {
    let mut backend = Box::new(RodioBackend::new());
    backend.initialize(config)?;
    Ok(backend)
}

/// Create the device backend, or a silent headless one if no device is available
pub fn create_backend_or_headless(config: &AudioBackendConfig) -> Box<dyn AudioBackend> {
    match create_backend(config) {
        Ok(backend) => backend,
        Err(e) => {
            log::warn!("Audio output unavailable, continuing silently: {}", e);
            let mut backend = HeadlessBackend::new();
            // Headless initialization cannot fail
            let _ = backend.initialize(config);
            Box::new(backend)
        }
    }
}
