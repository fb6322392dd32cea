//! Sound manager
//!
//! Façade tying the catalog, backend, volume state and playback arena
//! together. Owned by the application root and passed to whoever needs to
//! trigger sounds; there is no global instance.
//!
//! All calls happen on the thread that drives [`SoundManager::tick`]. State
//! changes made by the setters are visible to every later `play` call.

use super::backend::{AudioBackend, ChannelHandle};
use super::music::BackgroundMusic;
use super::playback::PlaybackHandle;
use super::{AudioAsset, AudioError, SoundCatalog, VolumeState};
use crate::config::{AudioSettings, ConfigError, ConfigStore};
use crate::foundation::collections::{PlaybackArena, PlaybackId};
use crate::foundation::time::SchedulerClock;

/// Parameters of a `play` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    /// Repeat until the channel is stopped
    pub looping: bool,
    /// Per-call volume; only loops use it
    pub volume: f32,
    /// Playback speed (1.0 = normal)
    pub pitch: f32,
}

impl PlayRequest {
    /// One-shot at normal volume and pitch
    pub fn one_shot() -> Self {
        Self::default()
    }

    /// Loop at normal volume and pitch
    pub fn looped() -> Self {
        Self {
            looping: true,
            ..Self::default()
        }
    }

    /// Set the per-call volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Set the playback speed
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

impl Default for PlayRequest {
    fn default() -> Self {
        Self {
            looping: false,
            volume: 1.0,
            pitch: 1.0,
        }
    }
}

/// Runtime sound manager
pub struct SoundManager {
    backend: Box<dyn AudioBackend>,
    catalog: SoundCatalog,
    store: Box<dyn ConfigStore>,
    volume: VolumeState,
    music: BackgroundMusic,
    playbacks: PlaybackArena<PlaybackHandle>,
    clock: SchedulerClock,
}

impl SoundManager {
    /// Build the manager and load persisted settings
    ///
    /// Settings that cannot be read are logged and replaced by defaults.
    ///
    /// # Errors
    /// Fails only if the background music channel cannot be allocated.
    pub fn new(
        mut backend: Box<dyn AudioBackend>,
        catalog: SoundCatalog,
        store: Box<dyn ConfigStore>,
    ) -> Result<Self, AudioError> {
        let music = BackgroundMusic::new(backend.as_mut())?;
        let mut manager = Self {
            backend,
            catalog,
            store,
            volume: VolumeState::new(),
            music,
            playbacks: PlaybackArena::with_key(),
            clock: SchedulerClock::new(),
        };
        manager.load_settings();
        Ok(manager)
    }

    fn read_settings(&self) -> Result<AudioSettings, ConfigError> {
        Ok(AudioSettings {
            music: self.store.music()?,
            volume: self.store.volume()?,
            sfx: self.store.sfx()?,
        })
    }

    fn load_settings(&mut self) {
        match self.read_settings() {
            Ok(settings) => {
                self.volume = VolumeState::from(settings);
                log::info!(
                    "Audio settings loaded: music={}, volume={}, sfx={}",
                    settings.music, settings.volume, settings.sfx
                );
            }
            Err(e) => {
                let e = AudioError::from(e);
                log::error!("Failed to load audio settings, using defaults: {}", e);
            }
        }
        self.sync_music_channel();
    }

    fn sync_music_channel(&mut self) {
        let backend = self.backend.as_mut();
        if let Err(e) = self.music.set_volume(backend, self.volume.master_volume) {
            log::warn!("Failed to set background music volume: {}", e);
        }
        if let Err(e) = self.music.set_muted(backend, self.volume.music_muted()) {
            log::warn!("Failed to set background music mute: {}", e);
        }
    }

    /// Play a sound from the catalog
    ///
    /// Returns `None` when sound effects are disabled or the request failed;
    /// failures are logged, never propagated.
    pub fn play(&mut self, name: &str, request: PlayRequest) -> Option<PlaybackId> {
        match self.try_play(name, request) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Could not play '{}': {}", name, e);
                None
            }
        }
    }

    /// One-shot at default volume and pitch
    pub fn play_sound(&mut self, name: &str) -> Option<PlaybackId> {
        self.play(name, PlayRequest::one_shot())
    }

    /// Play a sound, surfacing failures
    ///
    /// One-shots play at the master volume (the request volume is ignored);
    /// loops play at `request.volume * master volume`.
    ///
    /// # Errors
    /// - `SoundNotFound` if `name` is not in the catalog
    /// - backend errors if the channel cannot be allocated or started
    pub fn try_play(
        &mut self,
        name: &str,
        request: PlayRequest,
    ) -> Result<Option<PlaybackId>, AudioError> {
        if !self.volume.sfx_enabled {
            log::trace!("Sfx disabled, skipping '{}'", name);
            return Ok(None);
        }

        let clip = self
            .catalog
            .resolve(name)
            .ok_or_else(|| AudioError::SoundNotFound(name.to_string()))?
            .clone();

        let channel = self.backend.open_channel()?;
        match self.start_channel(name, channel, &clip, request) {
            Ok(handle) => {
                let id = self.playbacks.insert(handle);
                log::debug!("Playing '{}' (loop={}) on channel {}", name, request.looping, channel.id);
                Ok(Some(id))
            }
            Err(e) => {
                self.backend.close_channel(channel);
                Err(e)
            }
        }
    }

    fn start_channel(
        &mut self,
        name: &str,
        channel: ChannelHandle,
        clip: &AudioAsset,
        request: PlayRequest,
    ) -> Result<PlaybackHandle, AudioError> {
        self.backend.set_pitch(channel, request.pitch)?;

        let mut handle = if request.looping {
            self.backend.set_volume(channel, self.volume.loop_volume(request.volume))?;
            PlaybackHandle::looping(name, channel, request.volume, request.pitch)
        } else {
            self.backend.set_volume(channel, self.volume.one_shot_volume())?;
            PlaybackHandle::one_shot(
                name,
                channel,
                request.volume,
                request.pitch,
                self.clock.now(),
                clip.duration().as_secs_f64(),
            )
        };

        self.backend.play(channel, clip, request.looping)?;
        handle.mark_playing();
        Ok(handle)
    }

    /// Stop the channel of a live playback
    ///
    /// The handle itself is reclaimed on the next tick (loops) or when its
    /// timer fires (one-shots). Returns `false` for unknown or reclaimed ids.
    pub fn stop(&mut self, id: PlaybackId) -> bool {
        let Some(handle) = self.playbacks.get(id) else {
            return false;
        };
        if let Err(e) = self.backend.stop(handle.channel) {
            log::warn!("Failed to stop '{}': {}", handle.sound, e);
        }
        true
    }

    /// Stop and reclaim every live playback immediately
    ///
    /// Background music is left alone. Returns the number of playbacks reclaimed.
    pub fn stop_all(&mut self) -> usize {
        let ids: Vec<PlaybackId> = self.playbacks.keys().collect();
        for &id in &ids {
            self.reclaim(id);
        }
        ids.len()
    }

    /// Advance the scheduler by `delta` seconds and reclaim finished playbacks
    ///
    /// One-shots whose clip length has elapsed and loops whose channel is no
    /// longer playing are released. Returns the ids reclaimed this tick.
    pub fn tick(&mut self, delta: f32) -> Vec<PlaybackId> {
        self.clock.advance(delta);
        let now = self.clock.now();

        let backend = self.backend.as_ref();
        let due: Vec<PlaybackId> = self
            .playbacks
            .iter()
            .filter(|(_, handle)| handle.should_reclaim(now, backend))
            .map(|(id, _)| id)
            .collect();

        for &id in &due {
            self.reclaim(id);
        }
        self.backend.update();
        due
    }

    fn reclaim(&mut self, id: PlaybackId) {
        if let Some(mut handle) = self.playbacks.remove(id) {
            self.backend.close_channel(handle.channel);
            handle.mark_reclaimed();
            log::debug!(
                "Reclaimed {} '{}' (channel {})",
                if handle.is_looping() { "loop" } else { "one-shot" },
                handle.sound,
                handle.channel.id
            );
        }
    }

    /// Start the background music channel
    pub fn play_background_music(&mut self) {
        if let Err(e) = self.music.play(self.backend.as_mut()) {
            log::warn!("Failed to start background music: {}", e);
        }
    }

    /// Stop the background music channel
    pub fn stop_background_music(&mut self) {
        if let Err(e) = self.music.stop(self.backend.as_mut()) {
            log::warn!("Failed to stop background music: {}", e);
        }
    }

    /// Make background music audible (`true`) or mute it (`false`) and persist the flag
    pub fn mute_volume(&mut self, active: bool) {
        self.volume.music_enabled = active;
        if let Err(e) = self.music.set_muted(self.backend.as_mut(), !active) {
            log::warn!("Failed to set background music mute: {}", e);
        }
        if let Err(e) = self.store.set_music(active) {
            log::warn!("Failed to persist music setting: {}", e);
        }
    }

    /// Enable or disable sound effects and persist the flag
    ///
    /// Sounds already playing are unaffected.
    pub fn set_sfx(&mut self, active: bool) {
        self.volume.sfx_enabled = active;
        if let Err(e) = self.store.set_sfx(active) {
            log::warn!("Failed to persist sfx setting: {}", e);
        }
    }

    /// Set the master volume, apply it to background music and persist it
    ///
    /// Channels already playing keep the volume they started with.
    pub fn set_volume_value(&mut self, value: f32) {
        self.volume.master_volume = value;
        if let Err(e) = self.music.set_volume(self.backend.as_mut(), value) {
            log::warn!("Failed to set background music volume: {}", e);
        }
        if let Err(e) = self.store.set_volume(value) {
            log::warn!("Failed to persist volume setting: {}", e);
        }
    }

    /// Look up a clip by name
    pub fn get_sound_clip(&self, name: &str) -> Option<&AudioAsset> {
        self.catalog.resolve(name)
    }

    /// Assign the background music clip
    pub fn set_background_track(&mut self, track: AudioAsset) {
        self.music.set_track(track);
    }

    /// Assign a catalog entry as the background music clip
    ///
    /// # Errors
    /// - `SoundNotFound` if `name` is not in the catalog
    pub fn set_background_track_by_name(&mut self, name: &str) -> Result<(), AudioError> {
        let track = self
            .catalog
            .resolve(name)
            .ok_or_else(|| AudioError::SoundNotFound(name.to_string()))?
            .clone();
        self.music.set_track(track);
        Ok(())
    }

    /// Live playback by id
    pub fn playback(&self, id: PlaybackId) -> Option<&PlaybackHandle> {
        self.playbacks.get(id)
    }

    /// Check if a playback is still live
    pub fn is_active(&self, id: PlaybackId) -> bool {
        self.playbacks.contains_key(id)
    }

    /// Number of live playbacks (background music excluded)
    pub fn active_count(&self) -> usize {
        self.playbacks.len()
    }

    /// Current volume, music and sfx state
    pub fn volume_state(&self) -> VolumeState {
        self.volume
    }

    /// The background music channel
    pub fn background_music(&self) -> &BackgroundMusic {
        &self.music
    }

    /// The sound catalog
    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    /// The audio backend
    pub fn backend(&self) -> &dyn AudioBackend {
        self.backend.as_ref()
    }

    /// Mutable access to the backend, e.g. to stop a channel directly
    pub fn backend_mut(&mut self) -> &mut dyn AudioBackend {
        self.backend.as_mut()
    }

    /// Current scheduler time in seconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}
