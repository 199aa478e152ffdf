//! Reader configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lang::DEFAULT_MIN_CHARS;
use crate::tts::{Pitch, Rate, SpeechParams, VoiceGender, VoicePreference, Volume};
use crate::{Error, Result};

/// Default number of characters handed to the engine per utterance.
pub const DEFAULT_CHUNK_LENGTH: usize = 200;

/// Default delay between chunks, in milliseconds.
pub const DEFAULT_CHUNK_DELAY_MS: u64 = 100;

/// Settings for a [`Reader`](crate::Reader).
///
/// Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Characters per utterance. Must not be zero.
    pub chunk_length: usize,
    /// Pause between one chunk's end and the next chunk's request, in milliseconds.
    pub chunk_delay_ms: u64,
    /// Texts this short (or shorter) are not language-classified.
    pub min_detection_chars: usize,
    /// Initial speech rate, clamped to [0.1, 10].
    pub rate: f32,
    /// Initial pitch, clamped to [0, 2].
    pub pitch: f32,
    /// Initial volume, clamped to [0, 1].
    pub volume: f32,
    /// Voice names containing this are preferred when preselecting a voice.
    pub quality_marker: String,
    /// Voice gender preferred when preselecting a voice.
    pub preferred_gender: VoiceGender,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        let preference = VoicePreference::default();
        Self {
            chunk_length: DEFAULT_CHUNK_LENGTH,
            chunk_delay_ms: DEFAULT_CHUNK_DELAY_MS,
            min_detection_chars: DEFAULT_MIN_CHARS,
            rate: Rate::default().value(),
            pitch: Pitch::default().value(),
            volume: Volume::default().value(),
            quality_marker: preference.quality_marker,
            preferred_gender: preference.gender,
        }
    }
}

impl ReaderSettings {
    /// Checks the settings for values the reader cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_length == 0 {
            return Err(Error::InvalidSettings("chunk length must be at least 1".to_owned()));
        }
        for (name, value) in [("rate", self.rate), ("pitch", self.pitch), ("volume", self.volume)] {
            if !value.is_finite() {
                return Err(Error::InvalidSettings(format!("{} must be a finite number", name)));
            }
        }
        Ok(())
    }

    /// The chunk length, or [`Error::InvalidSettings`] if it is zero.
    pub fn chunk_length(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.chunk_length)
            .ok_or_else(|| Error::InvalidSettings("chunk length must be at least 1".to_owned()))
    }

    /// The delay between chunks.
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    /// The voice preselection rules.
    pub fn voice_preference(&self) -> VoicePreference {
        VoicePreference {
            quality_marker: self.quality_marker.clone(),
            gender: self.preferred_gender,
        }
    }

    /// The initial speech parameters, without a voice.
    pub fn speech_params(&self) -> SpeechParams {
        SpeechParams {
            voice: None,
            rate: Rate::new(self.rate),
            pitch: Pitch::new(self.pitch),
            volume: Volume::new(self.volume),
        }
    }
}
