//! # Audio Engine
//!
//! Runtime sound manager for games: a named sound catalog, one-shot and
//! looping effects with automatic cleanup, a background music channel, and
//! persisted volume / music / sfx settings.
//!
//! ## Features
//!
//! - **Sound Catalog**: name → clip lookup loaded from a TOML or RON manifest
//! - **Transient Playback**: every effect owns a channel that is released by
//!   timer (one-shots) or once its channel stops (loops)
//! - **Persisted Settings**: volume, music and sfx flags written through to
//!   a configuration store on every change
//! - **Lifecycle Events**: game state transitions wired to sound cues
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use audio_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = create_backend_or_headless(&AudioBackendConfig::default());
//!     let catalog = SoundCatalog::new().with_sound("coin", AudioAsset::from_file("audio/coin.wav")?);
//!     let store = FileConfigStore::open("audio.toml")?;
//!     let mut audio = SoundManager::new(backend, catalog, Box::new(store))?;
//!
//!     audio.play_sound("coin");
//!     loop {
//!         audio.tick(1.0 / 60.0);
//!         if audio.active_count() == 0 {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod audio;
pub mod events;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        audio::{
            AudioAsset, AudioError, PlayRequest, PlaybackId, SoundCatalog, CatalogManifest,
            SoundManager, VolumeState,
            backend::{AudioBackend, AudioBackendConfig, create_backend, create_backend_or_headless},
        },
        config::{Config, ConfigStore, FileConfigStore, MemoryConfigStore},
        events::{EventSystem, GameEvent, GameSession, SoundCue},
    };
}
