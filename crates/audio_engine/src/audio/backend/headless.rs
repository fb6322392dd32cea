//! Headless audio backend
//!
//! Tracks channel state in memory without producing sound. Used when no
//! output device exists and as the backend for deterministic tests. A
//! channel started here keeps "playing" until it is stopped or closed.

use super::{validate_pitch, AudioBackend, AudioBackendConfig, ChannelHandle};
use crate::audio::{AudioAsset, AudioError};
use std::collections::HashMap;

/// State of one simulated channel
#[derive(Debug, Clone)]
struct HeadlessChannel {
    clip: Option<AudioAsset>,
    volume: f32,
    pitch: f32,
    muted: bool,
    looping: bool,
    playing: bool,
}

impl Default for HeadlessChannel {
    fn default() -> Self {
        Self {
            clip: None,
            volume: 1.0,
            pitch: 1.0,
            muted: false,
            looping: false,
            playing: false,
        }
    }
}

/// Backend that simulates channels in memory
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    channels: HashMap<ChannelHandle, HeadlessChannel>,
    next_id: u32,
    initialized: bool,
}

impl HeadlessBackend {
    /// Create a new, uninitialized headless backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a headless backend that is ready for use
    pub fn initialized() -> Self {
        Self {
            initialized: true,
            ..Self::default()
        }
    }

    fn channel(&self, handle: ChannelHandle) -> Result<&HeadlessChannel, AudioError> {
        self.channels.get(&handle).ok_or(AudioError::InvalidHandle)
    }

    fn channel_mut(&mut self, handle: ChannelHandle) -> Result<&mut HeadlessChannel, AudioError> {
        self.channels.get_mut(&handle).ok_or(AudioError::InvalidHandle)
    }

    /// Check if a channel is set to loop
    pub fn is_looping(&self, handle: ChannelHandle) -> bool {
        self.channels.get(&handle).is_some_and(|channel| channel.looping)
    }

    /// Clip last started on a channel
    pub fn clip(&self, handle: ChannelHandle) -> Option<&AudioAsset> {
        self.channels.get(&handle).and_then(|channel| channel.clip.as_ref())
    }
}

impl AudioBackend for HeadlessBackend {
    fn initialize(&mut self, _config: &AudioBackendConfig) -> Result<(), AudioError> {
        if !self.initialized {
            self.initialized = true;
            log::info!("Headless audio backend initialized");
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.channels.clear();
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self) {}

    fn open_channel(&mut self) -> Result<ChannelHandle, AudioError> {
        if !self.initialized {
            return Err(AudioError::BackendNotInitialized);
        }
        let handle = ChannelHandle::new(self.next_id, 0);
        self.next_id = self.next_id.wrapping_add(1);
        self.channels.insert(handle, HeadlessChannel::default());
        Ok(handle)
    }

    fn close_channel(&mut self, channel: ChannelHandle) {
        self.channels.remove(&channel);
    }

    fn play(
        &mut self,
        channel: ChannelHandle,
        asset: &AudioAsset,
        looping: bool,
    ) -> Result<(), AudioError> {
        let state = self.channel_mut(channel)?;
        state.clip = Some(asset.clone());
        state.looping = looping;
        state.playing = true;
        Ok(())
    }

    fn stop(&mut self, channel: ChannelHandle) -> Result<(), AudioError> {
        self.channel_mut(channel)?.playing = false;
        Ok(())
    }

    fn set_volume(&mut self, channel: ChannelHandle, volume: f32) -> Result<(), AudioError> {
        self.channel_mut(channel)?.volume = volume;
        Ok(())
    }

    fn volume(&self, channel: ChannelHandle) -> Result<f32, AudioError> {
        Ok(self.channel(channel)?.volume)
    }

    fn set_pitch(&mut self, channel: ChannelHandle, pitch: f32) -> Result<(), AudioError> {
        let state = self.channel_mut(channel)?;
        validate_pitch(pitch)?;
        state.pitch = pitch;
        Ok(())
    }

    fn pitch(&self, channel: ChannelHandle) -> Result<f32, AudioError> {
        Ok(self.channel(channel)?.pitch)
    }

    fn set_muted(&mut self, channel: ChannelHandle, muted: bool) -> Result<(), AudioError> {
        self.channel_mut(channel)?.muted = muted;
        Ok(())
    }

    fn is_muted(&self, channel: ChannelHandle) -> Result<bool, AudioError> {
        Ok(self.channel(channel)?.muted)
    }

    fn is_playing(&self, channel: ChannelHandle) -> bool {
        self.channels.get(&channel).is_some_and(|state| state.playing)
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioFormat;
    use std::time::Duration;

    fn clip() -> AudioAsset {
        AudioAsset::new(vec![0u8; 4], AudioFormat::Wav, Duration::from_millis(500))
    }

    #[test]
    fn test_open_requires_initialization() {
        let mut backend = HeadlessBackend::new();
        assert!(matches!(backend.open_channel(), Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_channel_lifecycle() {
        let mut backend = HeadlessBackend::initialized();
        let channel = backend.open_channel().unwrap();
        assert_eq!(backend.channel_count(), 1);
        assert!(!backend.is_playing(channel));

        backend.play(channel, &clip(), true).unwrap();
        assert!(backend.is_playing(channel));
        assert!(backend.is_looping(channel));

        backend.stop(channel).unwrap();
        assert!(!backend.is_playing(channel));
        assert_eq!(backend.channel_count(), 1);

        backend.close_channel(channel);
        assert_eq!(backend.channel_count(), 0);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut backend = HeadlessBackend::initialized();
        let first = backend.open_channel().unwrap();
        backend.close_channel(first);
        let second = backend.open_channel().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = HeadlessBackend::initialized();
        let invalid = ChannelHandle::new(999, 0);

        assert!(matches!(backend.stop(invalid), Err(AudioError::InvalidHandle)));
        assert!(matches!(backend.set_volume(invalid, 0.5), Err(AudioError::InvalidHandle)));
        assert!(matches!(backend.volume(invalid), Err(AudioError::InvalidHandle)));
        assert!(matches!(backend.set_pitch(invalid, 2.0), Err(AudioError::InvalidHandle)));
        assert!(matches!(backend.set_muted(invalid, true), Err(AudioError::InvalidHandle)));
        assert!(!backend.is_playing(invalid));
    }

    #[test]
    fn test_rejects_unusable_pitch() {
        let mut backend = HeadlessBackend::initialized();
        let channel = backend.open_channel().unwrap();

        for pitch in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(backend.set_pitch(channel, pitch), Err(AudioError::PlaybackFailed(_))));
        }
        assert_eq!(backend.pitch(channel).unwrap(), 1.0);

        backend.set_pitch(channel, 0.5).unwrap();
        assert_eq!(backend.pitch(channel).unwrap(), 0.5);
    }

    #[test]
    fn test_shutdown_drops_channels() {
        let mut backend = HeadlessBackend::initialized();
        backend.open_channel().unwrap();
        backend.shutdown();
        assert_eq!(backend.channel_count(), 0);
        assert!(!backend.is_initialized());
    }
}
