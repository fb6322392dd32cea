//! Sound catalog
//!
//! Static registry mapping sound names to clips, filled at startup and read
//! only afterwards. Lookup is a linear scan in registration order, so the
//! first entry wins when a name is registered twice.

use super::{AudioAsset, AudioError};
use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named clip
#[derive(Debug, Clone)]
pub struct SoundEntry {
    /// Name used by callers to request the clip
    pub name: String,
    /// The clip itself
    pub clip: AudioAsset,
}

/// Registry of playable sounds
#[derive(Debug, Clone, Default)]
pub struct SoundCatalog {
    entries: Vec<SoundEntry>,
}

impl SoundCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip under `name`
    ///
    /// Duplicate names are accepted; only the first one is ever resolved.
    pub fn register(&mut self, name: impl Into<String>, clip: AudioAsset) {
        let name = name.into();
        if self.contains(&name) {
            log::warn!("Sound '{}' registered twice, the first entry wins", name);
        }
        self.entries.push(SoundEntry { name, clip });
    }

    /// Builder form of [`Self::register`]
    pub fn with_sound(mut self, name: impl Into<String>, clip: AudioAsset) -> Self {
        self.register(name, clip);
        self
    }

    /// Find the clip registered under `name`
    pub fn resolve(&self, name: &str) -> Option<&AudioAsset> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.clip)
    }

    /// Check if a sound is registered
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Number of registered entries, duplicates included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Load every sound listed in `manifest`
    ///
    /// Relative paths are resolved against `base_dir`.
    ///
    /// # Errors
    /// Fails on the first file that cannot be read or decoded.
    pub fn from_manifest(manifest: &CatalogManifest, base_dir: &Path) -> Result<Self, AudioError> {
        let mut catalog = Self::new();
        for spec in &manifest.sounds {
            let path = base_dir.join(&spec.path);
            let clip = AudioAsset::from_file(&path)?;
            log::debug!("Loaded sound '{}' ({:?}) from {}", spec.name, clip.duration(), path.display());
            catalog.register(spec.name.clone(), clip);
        }
        log::info!("Sound catalog loaded with {} entries", catalog.len());
        Ok(catalog)
    }
}

/// On-disk description of a sound catalog
///
/// ```toml
/// background_music = "theme"
///
/// [[sounds]]
/// name = "coin"
/// path = "audio/coin.wav"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogManifest {
    /// Name of the entry assigned to the background music channel
    pub background_music: Option<String>,
    /// Sounds to load
    pub sounds: Vec<SoundSpec>,
}

impl Config for CatalogManifest {}

/// One manifest line: a name and a file path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSpec {
    /// Name callers use to request the clip
    pub name: String,
    /// Audio file, relative to the manifest directory
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::asset::tests::silent_wav;
    use crate::audio::AudioFormat;
    use std::time::Duration;

    fn clip(millis: u64) -> AudioAsset {
        AudioAsset::new(vec![0u8; 4], AudioFormat::Wav, Duration::from_millis(millis))
    }

    #[test]
    fn test_registered_names_resolve_to_their_clip() {
        let coin = clip(500);
        let jump = clip(250);
        let catalog = SoundCatalog::new()
            .with_sound("coin", coin.clone())
            .with_sound("jump", jump.clone());

        assert!(catalog.resolve("coin").unwrap().same_clip(&coin));
        assert!(catalog.resolve("jump").unwrap().same_clip(&jump));
    }

    #[test]
    fn test_unregistered_name_is_none() {
        let catalog = SoundCatalog::new().with_sound("coin", clip(500));
        assert!(catalog.resolve("gameover").is_none());
        assert!(catalog.resolve("").is_none());
        assert!(catalog.resolve("Coin").is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let first = clip(100);
        let catalog = SoundCatalog::new()
            .with_sound("hit", first.clone())
            .with_sound("hit", clip(200));

        assert_eq!(catalog.len(), 2);
        assert!(catalog.resolve("hit").unwrap().same_clip(&first));
    }

    #[test]
    fn test_names_keep_registration_order() {
        let catalog = SoundCatalog::new()
            .with_sound("b", clip(1))
            .with_sound("a", clip(1));
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_manifest_parses_from_toml() {
        let manifest: CatalogManifest = toml::from_str(
            r#"
            background_music = "theme"

            [[sounds]]
            name = "coin"
            path = "coin.wav"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.background_music.as_deref(), Some("theme"));
        assert_eq!(manifest.sounds.len(), 1);
        assert_eq!(manifest.sounds[0].name, "coin");
    }

    #[test]
    fn test_from_manifest_loads_files() {
        let dir = std::env::temp_dir().join(format!("audio_engine_catalog_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("coin.wav"), silent_wav(8000, 4000)).unwrap();

        let manifest = CatalogManifest {
            background_music: None,
            sounds: vec![SoundSpec { name: "coin".into(), path: "coin.wav".into() }],
        };
        let catalog = SoundCatalog::from_manifest(&manifest, &dir).unwrap();

        let coin = catalog.resolve("coin").unwrap();
        assert!((coin.duration().as_secs_f32() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_from_manifest_missing_file_fails() {
        let manifest = CatalogManifest {
            background_music: None,
            sounds: vec![SoundSpec { name: "ghost".into(), path: "nope.wav".into() }],
        };
        let result = SoundCatalog::from_manifest(&manifest, Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(AudioError::Io(_))));
    }
}
