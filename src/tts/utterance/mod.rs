mod types;

pub use types::{Pitch, Rate, Volume};

use super::VoiceDescriptor;

/// A single unit of speech handed to the engine: a text chunk together with the voice settings
/// it should be rendered with.
#[derive(Debug, PartialEq, Clone)]
pub struct Utterance {
    /// The text to render.
    pub text: String,
    /// The voice to render with, or `None` for the engine's default voice.
    pub voice: Option<VoiceDescriptor>,
    /// Rate of speech.
    pub rate: Rate,
    /// Voice pitch.
    pub pitch: Pitch,
    /// Speech volume.
    pub volume: Volume,
}

impl Utterance {
    /// Creates an utterance with the default voice and settings.
    pub fn new<S: Into<String>>(text: S) -> Self {
        SpeechParams::default().utterance(text)
    }
}

/// Voice settings applied to every chunk the player speaks.
///
/// The player reads these when it issues each chunk, so changes made mid-playback take effect on
/// the next chunk.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct SpeechParams {
    /// The voice to speak with, or `None` for the engine's default voice.
    pub voice: Option<VoiceDescriptor>,
    /// Rate of speech.
    pub rate: Rate,
    /// Voice pitch.
    pub pitch: Pitch,
    /// Speech volume.
    pub volume: Volume,
}

impl SpeechParams {
    /// Builds the utterance for the given chunk of text.
    pub fn utterance<S: Into<String>>(&self, text: S) -> Utterance {
        Utterance {
            text: text.into(),
            voice: self.voice.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

impl<'s> From<&'s str> for Utterance {
    fn from(s: &'s str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Utterance {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
