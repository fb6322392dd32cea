//! Audio asset types for loading and managing audio data
//!
//! An [`AudioAsset`] keeps the encoded file bytes (decoded on demand by the
//! backend during playback) together with the clip length, which drives
//! one-shot reclamation.

use super::AudioError;
use rodio::{Decoder, Source};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Audio asset holding encoded audio data
///
/// Cloning is cheap: the byte buffer is shared.
#[derive(Clone)]
pub struct AudioAsset {
    /// Raw audio file data (encoded format)
    data: Arc<[u8]>,
    /// Original file format
    format: AudioFormat,
    /// Clip length at normal pitch
    duration: Duration,
}

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
    /// Unknown format
    Unknown,
}

impl AudioAsset {
    /// Create a new audio asset from raw bytes with a known clip length
    ///
    /// # Arguments
    /// * `data` - Raw audio file bytes
    /// * `format` - Audio format
    /// * `duration` - Clip length at normal pitch
    pub fn new(data: impl Into<Arc<[u8]>>, format: AudioFormat, duration: Duration) -> Self {
        Self {
            data: data.into(),
            format,
            duration,
        }
    }

    /// Decode `bytes` once to validate them and measure the clip length
    ///
    /// # Errors
    /// - `InvalidData` if the bytes are empty, of unknown format, or fail to decode
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::InvalidData("Empty audio file".to_string()));
        }

        let format = Self::detect_format(bytes);
        if format == AudioFormat::Unknown {
            return Err(AudioError::InvalidData("Unknown audio format".to_string()));
        }

        let data: Arc<[u8]> = Arc::from(bytes);
        let duration = Self::measure_duration(&data)?;
        Ok(Self { data, format, duration })
    }

    /// Load and decode an audio file from disk
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `InvalidData` if its contents are not playable audio
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            AudioError::InvalidData(msg) => {
                AudioError::InvalidData(format!("{}: {}", path.as_ref().display(), msg))
            }
            other => other,
        })
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the raw audio data
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Format detected when the asset was created
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Clip length at normal pitch
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Check if two handles share the same underlying clip
    pub fn same_clip(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Detect audio format from magic bytes
    fn detect_format(bytes: &[u8]) -> AudioFormat {
        if bytes.len() < 4 {
            return AudioFormat::Unknown;
        }

        match &bytes[0..4] {
            b"RIFF" => AudioFormat::Wav,
            b"OggS" => AudioFormat::Ogg,
            b"fLaC" => AudioFormat::Flac,
            // MP3 can start with ID3 tag or frame sync
            [0xFF, 0xFB, _, _] | [0xFF, 0xFA, _, _] | [b'I', b'D', b'3', _] => AudioFormat::Mp3,
            _ => AudioFormat::Unknown,
        }
    }

    /// Clip length reported by the decoder, or counted from decoded samples
    fn measure_duration(data: &Arc<[u8]>) -> Result<Duration, AudioError> {
        let decoder = Decoder::new(Cursor::new(Arc::clone(data)))
            .map_err(|e| AudioError::InvalidData(format!("Failed to decode audio: {}", e)))?;

        if let Some(duration) = decoder.total_duration() {
            return Ok(duration);
        }

        let sample_rate = f64::from(decoder.sample_rate());
        let channels = f64::from(decoder.channels());
        if sample_rate <= 0.0 || channels <= 0.0 {
            return Err(AudioError::InvalidData("Stream reports no samples".to_string()));
        }

        #[allow(clippy::cast_precision_loss)]
        let samples = decoder.count() as f64;
        Ok(Duration::from_secs_f64(samples / (sample_rate * channels)))
    }
}

impl std::fmt::Debug for AudioAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAsset")
            .field("bytes", &self.data.len())
            .field("format", &self.format)
            .field("duration", &self.duration)
            .finish()
    }
}
