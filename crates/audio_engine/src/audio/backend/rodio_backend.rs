//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Rodio is pure Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//!
//! Each channel owns at most one [`Sink`]. Starting a clip replaces the
//! sink, so a stopped channel can be played again (the background music
//! channel relies on this).
//!
//! # Example
//!
//! ```no_run
//! use audio_engine::audio::backend::{AudioBackend, AudioBackendConfig};
//! use audio_engine::audio::backend::rodio_backend::RodioBackend;
//! use audio_engine::audio::AudioAsset;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize(&AudioBackendConfig::default()).unwrap();
//!
//! let clip = AudioAsset::from_file("resources/audio/coin.wav").unwrap();
//! let channel = backend.open_channel().unwrap();
//! backend.set_volume(channel, 0.5).unwrap();
//! backend.play(channel, &clip, false).unwrap();
//!
//! if backend.is_playing(channel) {
//!     println!("Sound is playing!");
//! }
//!
//! backend.close_channel(channel);
//! backend.shutdown();
//! ```

use super::{validate_pitch, AudioBackend, AudioBackendConfig, ChannelHandle};
use crate::audio::{AudioAsset, AudioError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::io::Cursor;

/// One output channel and its mixing parameters
struct RodioChannel {
    /// Active sink, `None` while idle or after the clip finished
    sink: Option<Sink>,
    volume: f32,
    pitch: f32,
    muted: bool,
}

impl RodioChannel {
    fn new() -> Self {
        Self {
            sink: None,
            volume: 1.0,
            pitch: 1.0,
            muted: false,
        }
    }

    /// Volume actually sent to the sink
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    fn apply_volume(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
    }
}

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Open channels
    channels: HashMap<ChannelHandle, RodioChannel>,
    /// Next channel ID for handle generation
    next_id: u32,
    /// Initialization state
    initialized: bool,
}

impl RodioBackend {
    /// Create a new Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            channels: HashMap::new(),
            next_id: 0,
            initialized: false,
        }
    }
    
    /// Generate a new channel handle
    fn next_handle(&mut self) -> ChannelHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        ChannelHandle::new(id, 0)
    }

    fn channel(&self, handle: ChannelHandle) -> Result<&RodioChannel, AudioError> {
        self.channels.get(&handle).ok_or(AudioError::InvalidHandle)
    }

    fn channel_mut(&mut self, handle: ChannelHandle) -> Result<&mut RodioChannel, AudioError> {
        self.channels.get_mut(&handle).ok_or(AudioError::InvalidHandle)
    }
}

impl AudioBackend for RodioBackend {
    fn initialize(&mut self, _config: &AudioBackendConfig) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }
        
        // Create output stream
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {}", e)))?;
        
        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.initialized = true;
        
        log::info!("Rodio audio backend initialized");
        Ok(())
    }
    
    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        
        for (_handle, channel) in self.channels.drain() {
            if let Some(sink) = channel.sink {
                sink.stop();
            }
        }
        
        // Drop stream handle and output
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;
        
        log::info!("Rodio audio backend shutdown");
    }
    
    fn is_initialized(&self) -> bool {
        self.initialized
    }
    
    fn update(&mut self) {
        // Release sinks whose clip ran out; the channel itself stays open
        for channel in self.channels.values_mut() {
            if channel.sink.as_ref().is_some_and(Sink::empty) {
                channel.sink = None;
            }
        }
    }

    fn open_channel(&mut self) -> Result<ChannelHandle, AudioError> {
        if !self.initialized {
            return Err(AudioError::BackendNotInitialized);
        }
        let handle = self.next_handle();
        self.channels.insert(handle, RodioChannel::new());
        Ok(handle)
    }

    fn close_channel(&mut self, channel: ChannelHandle) {
        if let Some(sink) = self.channels.remove(&channel).and_then(|state| state.sink) {
            sink.stop();
        }
    }

    fn play(
        &mut self,
        channel: ChannelHandle,
        asset: &AudioAsset,
        looping: bool,
    ) -> Result<(), AudioError> {
        let stream_handle = self.stream_handle.as_ref()
            .ok_or(AudioError::BackendNotInitialized)?;
        
        // Fresh sink per start so a stopped channel can be reused
        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;
        
        let source = Decoder::new(Cursor::new(asset.shared_data()))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode audio: {}", e)))?;

        let state = self.channels.get_mut(&channel).ok_or(AudioError::InvalidHandle)?;
        let source = source.speed(state.pitch);
        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.set_volume(state.effective_volume());

        if let Some(previous) = state.sink.replace(sink) {
            previous.stop();
        }
        Ok(())
    }
    
    fn stop(&mut self, channel: ChannelHandle) -> Result<(), AudioError> {
        if let Some(sink) = self.channel_mut(channel)?.sink.take() {
            sink.stop();
        }
        Ok(())
    }
    
    fn set_volume(&mut self, channel: ChannelHandle, volume: f32) -> Result<(), AudioError> {
        let state = self.channel_mut(channel)?;
        state.volume = volume;
        state.apply_volume();
        Ok(())
    }
    
    fn volume(&self, channel: ChannelHandle) -> Result<f32, AudioError> {
        Ok(self.channel(channel)?.volume)
    }

    fn set_pitch(&mut self, channel: ChannelHandle, pitch: f32) -> Result<(), AudioError> {
        // Applied when the next clip starts
        let state = self.channel_mut(channel)?;
        validate_pitch(pitch)?;
        state.pitch = pitch;
        Ok(())
    }

    fn pitch(&self, channel: ChannelHandle) -> Result<f32, AudioError> {
        Ok(self.channel(channel)?.pitch)
    }

    fn set_muted(&mut self, channel: ChannelHandle, muted: bool) -> Result<(), AudioError> {
        let state = self.channel_mut(channel)?;
        state.muted = muted;
        state.apply_volume();
        Ok(())
    }

    fn is_muted(&self, channel: ChannelHandle) -> Result<bool, AudioError> {
        Ok(self.channel(channel)?.muted)
    }
    
    fn is_playing(&self, channel: ChannelHandle) -> bool {
        self.channels.get(&channel)
            .and_then(|state| state.sink.as_ref())
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::asset::tests::silent_wav;

    #[test]
    fn test_backend_initialization() {
        let mut backend = RodioBackend::new();
        assert!(!backend.is_initialized());
        
        let config = AudioBackendConfig::default();
        let result = backend.initialize(&config);
        
        // May fail in CI/test environments without audio device
        if result.is_ok() {
            assert!(backend.is_initialized());
            backend.shutdown();
            assert!(!backend.is_initialized());
        }
    }
    
    #[test]
    fn test_handle_generation() {
        let mut backend = RodioBackend::new();
        let handle1 = backend.next_handle();
        let handle2 = backend.next_handle();
        
        assert_ne!(handle1.id, handle2.id);
    }
    
    #[test]
    fn test_double_initialization() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();
        
        if backend.initialize(&config).is_ok() {
            // Second initialization should succeed
            assert!(backend.initialize(&config).is_ok());
            backend.shutdown();
        }
    }
    
    #[test]
    fn test_channel_without_initialization() {
        let mut backend = RodioBackend::new();
        assert!(matches!(backend.open_channel(), Err(AudioError::BackendNotInitialized)));
    }
    
    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();
        
        if backend.initialize(&config).is_ok() {
            let invalid_handle = ChannelHandle::new(999, 0);
            
            // All operations on invalid handle should return error
            assert!(matches!(backend.stop(invalid_handle), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.set_volume(invalid_handle, 0.5), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.volume(invalid_handle), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.set_muted(invalid_handle, true), Err(AudioError::InvalidHandle)));
            assert!(!backend.is_playing(invalid_handle));
            
            backend.shutdown();
        }
    }
    
    #[test]
    fn test_zero_pitch_rejected_before_play() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();

        if backend.initialize(&config).is_ok() {
            let channel = backend.open_channel().unwrap();
            assert!(matches!(backend.set_pitch(channel, 0.0), Err(AudioError::PlaybackFailed(_))));
            assert!(matches!(backend.set_pitch(channel, f32::NAN), Err(AudioError::PlaybackFailed(_))));
            assert_eq!(backend.pitch(channel).unwrap(), 1.0);
            backend.shutdown();
        }
    }

    #[test]
    fn test_stop_keeps_channel_open() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();
        
        if backend.initialize(&config).is_ok() {
            let clip = AudioAsset::from_bytes(&silent_wav(8000, 8000)).unwrap();
            let channel = backend.open_channel().unwrap();
            backend.play(channel, &clip, true).unwrap();
            assert!(backend.is_playing(channel));

            backend.stop(channel).unwrap();
            assert!(!backend.is_playing(channel));
            assert_eq!(backend.channel_count(), 1);

            backend.close_channel(channel);
            assert_eq!(backend.channel_count(), 0);
            backend.shutdown();
        }
    }
    
    #[test]
    fn test_mute_keeps_requested_volume() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();
        
        if backend.initialize(&config).is_ok() {
            let channel = backend.open_channel().unwrap();
            backend.set_volume(channel, 0.4).unwrap();
            backend.set_muted(channel, true).unwrap();

            assert!(backend.is_muted(channel).unwrap());
            assert_eq!(backend.volume(channel).unwrap(), 0.4);
            backend.shutdown();
        }
    }
}
