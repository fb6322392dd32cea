//! Persisted audio settings
//!
//! Three global values survive between runs: `Music` (background music
//! audible), `Volume` (master volume) and `Sfx` (effects enabled). The store
//! is write-through: every setter persists immediately.

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Key-value store holding the persisted audio settings
pub trait ConfigStore {
    /// Whether background music is audible
    fn music(&self) -> Result<bool, ConfigError>;

    /// Persist the background music flag
    fn set_music(&mut self, active: bool) -> Result<(), ConfigError>;

    /// Master volume
    fn volume(&self) -> Result<f32, ConfigError>;

    /// Persist the master volume
    fn set_volume(&mut self, value: f32) -> Result<(), ConfigError>;

    /// Whether sound effects are enabled
    fn sfx(&self) -> Result<bool, ConfigError>;

    /// Persist the sound effects flag
    fn set_sfx(&mut self, active: bool) -> Result<(), ConfigError>;
}

/// Serialized form of the audio settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Background music audible
    #[serde(rename = "Music")]
    pub music: bool,
    /// Master volume, conventionally 0.0 to 1.0
    #[serde(rename = "Volume")]
    pub volume: f32,
    /// Sound effects enabled
    #[serde(rename = "Sfx")]
    pub sfx: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music: true,
            volume: 1.0,
            sfx: true,
        }
    }
}

impl Config for AudioSettings {}

/// In-process settings store
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    settings: AudioSettings,
}

impl MemoryConfigStore {
    /// Create a store with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `settings`
    pub fn with_settings(settings: AudioSettings) -> Self {
        Self { settings }
    }

    /// Current settings snapshot
    pub fn settings(&self) -> AudioSettings {
        self.settings
    }
}

impl ConfigStore for MemoryConfigStore {
    fn music(&self) -> Result<bool, ConfigError> {
        Ok(self.settings.music)
    }

    fn set_music(&mut self, active: bool) -> Result<(), ConfigError> {
        self.settings.music = active;
        Ok(())
    }

    fn volume(&self) -> Result<f32, ConfigError> {
        Ok(self.settings.volume)
    }

    fn set_volume(&mut self, value: f32) -> Result<(), ConfigError> {
        self.settings.volume = value;
        Ok(())
    }

    fn sfx(&self) -> Result<bool, ConfigError> {
        Ok(self.settings.sfx)
    }

    fn set_sfx(&mut self, active: bool) -> Result<(), ConfigError> {
        self.settings.sfx = active;
        Ok(())
    }
}

/// Settings store persisted to a TOML or RON file
///
/// A missing file yields default settings; the file is created on the first
/// write. Each setter rewrites the whole document.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    settings: AudioSettings,
}

impl FileConfigStore {
    /// Open the store at `path`
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the extension is neither `.toml` nor `.ron`
    /// - `Io` / `Parse` if an existing file cannot be read or parsed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        super::ConfigFormat::from_path(&path)?;

        let settings = if path.exists() {
            AudioSettings::load_from_file(&path)?
        } else {
            log::info!("No audio settings at {}, using defaults", path.display());
            AudioSettings::default()
        };

        Ok(Self { path, settings })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings snapshot
    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    fn persist(&self) -> Result<(), ConfigError> {
        self.settings.save_to_file(&self.path)
    }
}

impl ConfigStore for FileConfigStore {
    fn music(&self) -> Result<bool, ConfigError> {
        Ok(self.settings.music)
    }

    fn set_music(&mut self, active: bool) -> Result<(), ConfigError> {
        self.settings.music = active;
        self.persist()
    }

    fn volume(&self) -> Result<f32, ConfigError> {
        Ok(self.settings.volume)
    }

    fn set_volume(&mut self, value: f32) -> Result<(), ConfigError> {
        self.settings.volume = value;
        self.persist()
    }

    fn sfx(&self) -> Result<bool, ConfigError> {
        Ok(self.settings.sfx)
    }

    fn set_sfx(&mut self, active: bool) -> Result<(), ConfigError> {
        self.settings.sfx = active;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("audio_engine_store_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_memory_store_defaults() {
        let store = MemoryConfigStore::new();
        assert!(store.music().unwrap());
        assert_eq!(store.volume().unwrap(), 1.0);
        assert!(store.sfx().unwrap());
    }

    #[test]
    fn test_missing_file_uses_defaults_without_writing() {
        let path = temp_path("missing.toml");
        let _ = std::fs::remove_file(&path);

        let store = FileConfigStore::open(&path).unwrap();
        assert_eq!(store.settings(), AudioSettings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_toml_write_through() {
        let path = temp_path("write_through.toml");
        let _ = std::fs::remove_file(&path);

        let mut store = FileConfigStore::open(&path).unwrap();
        store.set_volume(0.3).unwrap();
        store.set_music(false).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Music = false"));
        assert!(contents.contains("Volume = 0.3"));

        let reopened = FileConfigStore::open(&path).unwrap();
        assert!(!reopened.music().unwrap());
        assert_eq!(reopened.volume().unwrap(), 0.3);
        assert!(reopened.sfx().unwrap());
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("settings.ron");
        let _ = std::fs::remove_file(&path);

        let mut store = FileConfigStore::open(&path).unwrap();
        store.set_sfx(false).unwrap();

        let reopened = FileConfigStore::open(&path).unwrap();
        assert!(!reopened.sfx().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "Sfx = false\n").unwrap();

        let store = FileConfigStore::open(&path).unwrap();
        assert!(!store.sfx().unwrap());
        assert!(store.music().unwrap());
        assert_eq!(store.volume().unwrap(), 1.0);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let path = temp_path("corrupt.toml");
        std::fs::write(&path, "Volume = [not a float").unwrap();

        assert!(matches!(FileConfigStore::open(&path), Err(ConfigError::Parse(_))));
    }
}
