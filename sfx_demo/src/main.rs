//! Sound effect demo application
//!
//! Loads a sound catalog manifest and persisted audio settings, plays the
//! requested sounds as one-shots and drives the scheduler at 60 Hz until
//! every playback has been reclaimed.
//!
//! Usage: `sfx_demo <manifest.toml|ron> [settings.toml|ron] [sound...]`

use audio_engine::audio::backend::{create_backend_or_headless, AudioBackendConfig};
use audio_engine::audio::{AudioError, CatalogManifest, SoundCatalog, SoundManager};
use audio_engine::config::{Config, ConfigError, FileConfigStore};
use audio_engine::foundation::logging;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_micros(16_667);
const DEFAULT_SETTINGS: &str = "audio_settings.toml";
/// Upper bound on how long the demo keeps ticking
const MAX_RUN: Duration = Duration::from_secs(120);

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("usage: sfx_demo <manifest> [settings] [sound...]")]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

struct DemoArgs {
    manifest: PathBuf,
    settings: PathBuf,
    sounds: Vec<String>,
}

impl DemoArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, DemoError> {
        let manifest = args.next().map(PathBuf::from).ok_or(DemoError::Usage)?;
        let mut settings = PathBuf::from(DEFAULT_SETTINGS);
        let mut sounds = Vec::new();
        for arg in args {
            if sounds.is_empty() && (arg.ends_with(".toml") || arg.ends_with(".ron")) {
                settings = PathBuf::from(arg);
            } else {
                sounds.push(arg);
            }
        }
        Ok(Self { manifest, settings, sounds })
    }
}

fn build_manager(args: &DemoArgs) -> Result<(SoundManager, CatalogManifest), DemoError> {
    log::info!("Loading sound manifest {}", args.manifest.display());
    let manifest = CatalogManifest::load_from_file(&args.manifest)?;
    let base_dir = args.manifest.parent().unwrap_or_else(|| Path::new("."));
    let catalog = SoundCatalog::from_manifest(&manifest, base_dir)?;

    let store = FileConfigStore::open(&args.settings)?;
    let backend = create_backend_or_headless(&AudioBackendConfig::default());
    let mut manager = SoundManager::new(backend, catalog, Box::new(store))?;

    if let Some(name) = &manifest.background_music {
        manager.set_background_track_by_name(name)?;
    }
    Ok((manager, manifest))
}

fn run() -> Result<(), DemoError> {
    let args = DemoArgs::parse(std::env::args().skip(1))?;
    let (mut manager, manifest) = build_manager(&args)?;

    let sounds = if args.sounds.is_empty() {
        manager.catalog().names().map(str::to_owned).collect()
    } else {
        args.sounds.clone()
    };

    if manifest.background_music.is_some() {
        manager.play_background_music();
    }

    for name in &sounds {
        if manager.play_sound(name).is_some() {
            log::info!("Playing '{}'", name);
        }
    }

    let start = Instant::now();
    let mut last_frame = start;
    while manager.active_count() > 0 && start.elapsed() < MAX_RUN {
        std::thread::sleep(FRAME);
        let now = Instant::now();
        let reclaimed = manager.tick(now.duration_since(last_frame).as_secs_f32());
        last_frame = now;
        if !reclaimed.is_empty() {
            log::info!("{} sound(s) finished, {} still playing", reclaimed.len(), manager.active_count());
        }
    }

    manager.stop_background_music();
    log::info!("Done after {:.2}s", start.elapsed().as_secs_f32());
    Ok(())
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
