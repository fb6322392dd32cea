//! Volume, mute and sfx state
//!
//! Process-wide mixing state owned by the sound manager. It is mutated only
//! through the manager's setters, which persist each change immediately.

use crate::config::AudioSettings;

/// Global volume, music and effects flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    /// Master volume, conventionally 0.0 to 1.0 (not clamped)
    pub master_volume: f32,
    /// Whether `play` requests are honoured
    pub sfx_enabled: bool,
    /// Persisted `Music` flag: `true` keeps background music audible
    pub music_enabled: bool,
}

impl VolumeState {
    /// Create the default state: full volume, music and effects on
    pub fn new() -> Self {
        Self {
            master_volume: 1.0,
            sfx_enabled: true,
            music_enabled: true,
        }
    }

    /// Channel volume for a one-shot effect
    ///
    /// One-shots use the master volume alone; the per-call volume is ignored.
    pub fn one_shot_volume(&self) -> f32 {
        self.master_volume
    }

    /// Channel volume for a looping effect requested at `volume`
    pub fn loop_volume(&self, volume: f32) -> f32 {
        volume * self.master_volume
    }

    /// Mute flag applied to the background music channel
    pub fn music_muted(&self) -> bool {
        !self.music_enabled
    }

    /// Snapshot in persisted form
    pub fn to_settings(&self) -> AudioSettings {
        AudioSettings {
            music: self.music_enabled,
            volume: self.master_volume,
            sfx: self.sfx_enabled,
        }
    }
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<AudioSettings> for VolumeState {
    fn from(settings: AudioSettings) -> Self {
        Self {
            master_volume: settings.volume,
            sfx_enabled: settings.sfx,
            music_enabled: settings.music,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_state() {
        let state = VolumeState::new();
        assert_eq!(state.master_volume, 1.0);
        assert!(state.sfx_enabled);
        assert!(!state.music_muted());
    }

    #[test]
    fn test_one_shot_ignores_request_volume() {
        let state = VolumeState { master_volume: 0.3, ..VolumeState::new() };
        assert_eq!(state.one_shot_volume(), 0.3);
    }

    #[test]
    fn test_loop_volume_scales_by_master() {
        let state = VolumeState { master_volume: 0.3, ..VolumeState::new() };
        assert_relative_eq!(state.loop_volume(0.5), 0.15);
    }

    #[test]
    fn test_volume_is_not_clamped() {
        let state = VolumeState { master_volume: 1.5, ..VolumeState::new() };
        assert_relative_eq!(state.loop_volume(2.0), 3.0);
    }

    #[test]
    fn test_settings_conversion() {
        let settings = AudioSettings { music: false, volume: 0.7, sfx: false };
        let state = VolumeState::from(settings);
        assert!(state.music_muted());
        assert!(!state.sfx_enabled);
        assert_eq!(state.to_settings(), settings);
    }
}
