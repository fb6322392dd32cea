//! Music system
//!
//! A single long-lived channel for background music, allocated once when the
//! sound manager is built. Its volume and mute flag mirror the manager's
//! [`super::VolumeState`]; playback never goes through the transient
//! playback arena.

use super::backend::{AudioBackend, ChannelHandle};
use super::{AudioAsset, AudioError};

/// Music playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    /// No music is playing
    Stopped,
    /// Music is playing (possibly muted)
    Playing,
}

/// The background music channel
#[derive(Debug)]
pub struct BackgroundMusic {
    channel: ChannelHandle,
    track: Option<AudioAsset>,
    state: MusicState,
}

impl BackgroundMusic {
    /// Allocate the channel on `backend`
    pub fn new(backend: &mut dyn AudioBackend) -> Result<Self, AudioError> {
        Ok(Self {
            channel: backend.open_channel()?,
            track: None,
            state: MusicState::Stopped,
        })
    }

    /// Channel owned by the music system
    pub fn channel(&self) -> ChannelHandle {
        self.channel
    }

    /// Current playback state
    pub fn state(&self) -> MusicState {
        self.state
    }

    /// Track assigned to the channel
    pub fn track(&self) -> Option<&AudioAsset> {
        self.track.as_ref()
    }

    /// Assign the clip played by [`Self::play`]
    ///
    /// Takes effect on the next `play`; a running track keeps going.
    pub fn set_track(&mut self, track: AudioAsset) {
        self.track = Some(track);
    }

    /// Start (or restart) the track on a loop
    pub fn play(&mut self, backend: &mut dyn AudioBackend) -> Result<(), AudioError> {
        let Some(track) = &self.track else {
            log::warn!("No background music track assigned");
            return Ok(());
        };
        backend.play(self.channel, track, true)?;
        self.state = MusicState::Playing;
        log::debug!("Background music started");
        Ok(())
    }

    /// Stop the track; the channel stays allocated
    pub fn stop(&mut self, backend: &mut dyn AudioBackend) -> Result<(), AudioError> {
        backend.stop(self.channel)?;
        self.state = MusicState::Stopped;
        log::debug!("Background music stopped");
        Ok(())
    }

    /// Set the channel volume
    pub fn set_volume(
        &mut self,
        backend: &mut dyn AudioBackend,
        volume: f32,
    ) -> Result<(), AudioError> {
        backend.set_volume(self.channel, volume)
    }

    /// Mute or unmute the channel without stopping it
    pub fn set_muted(
        &mut self,
        backend: &mut dyn AudioBackend,
        muted: bool,
    ) -> Result<(), AudioError> {
        backend.set_muted(self.channel, muted)
    }
}
