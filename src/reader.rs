use std::io::Read;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::lang::{DetectionResult, LanguageClassifier};
use crate::settings::ReaderSettings;
use crate::text::{read_text, TextStats};
use crate::tts::{
    ChunkPlayer, Pitch, PlaybackListener, PlaybackStatus, Rate, Scheduler, SpeechEngine,
    VoiceDescriptor, VoicePreference, Volume,
};
use crate::Result;

/// The controller behind a reading page: it owns the text, picks a voice for its language and
/// drives a [`ChunkPlayer`].
///
/// The UI calls the command methods and renders what the [`PlaybackListener`] reports.
pub struct Reader<E: SpeechEngine + 'static> {
    engine: Arc<E>,
    player: ChunkPlayer<E>,
    listener: Arc<dyn PlaybackListener>,
    classifier: LanguageClassifier,
    preference: VoicePreference,
    chunk_length: NonZeroUsize,
    voices: Vec<VoiceDescriptor>,
    text: String,
    stats: TextStats,
    detection: Option<DetectionResult>,
    preselect_pending: bool,
}

impl<E: SpeechEngine + 'static> Reader<E> {
    /// Creates a reader with no text and loads the engine's voices.
    pub fn new(
        engine: Arc<E>,
        scheduler: Arc<dyn Scheduler>,
        listener: Arc<dyn PlaybackListener>,
        settings: &ReaderSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let player = ChunkPlayer::with_chunk_delay(
            engine.clone(),
            scheduler,
            listener.clone(),
            settings.chunk_delay(),
        );
        player.set_parameters(settings.speech_params());

        let mut reader = Self {
            engine,
            player,
            listener,
            classifier: LanguageClassifier::default().with_min_chars(settings.min_detection_chars),
            preference: settings.voice_preference(),
            chunk_length: settings.chunk_length()?,
            voices: Vec::new(),
            text: String::new(),
            stats: TextStats::default(),
            detection: None,
            preselect_pending: false,
        };
        reader.refresh_voices();
        Ok(reader)
    }

    /// Replaces the language classifier, e.g. with one over a custom signature table.
    pub fn with_classifier(mut self, classifier: LanguageClassifier) -> Self {
        self.classifier = classifier;
        self.detection = self.classifier.detect(&self.text);
        self.preselect_voice();
        self
    }

    /// Reloads the engine's voices. Call this whenever the engine reports that its voice list
    /// changed.
    ///
    /// The engine's default voice is selected, unless a voice for the detected language exists.
    pub fn refresh_voices(&mut self) {
        self.voices = self.engine.voices();
        debug!(count = self.voices.len(), "voices loaded");

        let default = self
            .voices
            .iter()
            .find(|voice| voice.is_default)
            .or_else(|| self.voices.first())
            .cloned();
        self.use_voice(default);
        self.preselect_voice();
    }

    /// The voices to offer, those speaking the detected language first.
    pub fn voices(&self) -> Vec<&VoiceDescriptor> {
        match &self.detection {
            Some(detection) => self.preference.rank(&self.voices, &detection.tag),
            None => self.voices.iter().collect(),
        }
    }

    /// The voice chunks are currently spoken with.
    pub fn selected_voice(&self) -> Option<VoiceDescriptor> {
        self.player.parameters().voice
    }

    /// Replaces the text to read, recounts it and re-detects its language.
    ///
    /// While playback is active the voice is left alone, so the text being read keeps its voice.
    /// The voice for the new text is then preselected by the next [`speak`](Reader::speak).
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
        self.stats = TextStats::of(&self.text);
        self.detection = self.classifier.detect(&self.text);
        if self.player.status().is_active() {
            debug!("playback active, voice preselection deferred");
            self.preselect_pending = true;
        } else {
            self.preselect_voice();
        }
    }

    /// Replaces the text with the contents of a text source, such as an uploaded file.
    ///
    /// On failure the current text is kept and the error also goes to the listener.
    pub fn load_text<R: Read>(&mut self, source: R) -> Result<()> {
        match read_text(source) {
            Ok(text) => {
                info!(bytes = text.len(), "text loaded");
                self.set_text(text);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "failed to load text");
                self.listener.on_error(&err);
                Err(err)
            }
        }
    }

    /// The text that [`speak`](Reader::speak) reads.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Word and character counts of the text.
    pub fn text_stats(&self) -> TextStats {
        self.stats
    }

    /// The detected language, or `None` if the text is too short to classify.
    pub fn detected_language(&self) -> Option<&DetectionResult> {
        self.detection.as_ref()
    }

    /// Sets the speech parameters for subsequent chunks. `voice` is a voice name from
    /// [`voices`](Reader::voices); `None` or an unknown name keeps the current voice.
    pub fn set_parameters<R, P, V>(&mut self, rate: R, pitch: P, volume: V, voice: Option<&str>)
    where
        R: Into<Rate>,
        P: Into<Pitch>,
        V: Into<Volume>,
    {
        let mut params = self.player.parameters();
        params.rate = rate.into();
        params.pitch = pitch.into();
        params.volume = volume.into();
        if let Some(name) = voice {
            match self.voices.iter().find(|voice| voice.name == name) {
                Some(voice) => {
                    params.voice = Some(voice.clone());
                    self.preselect_pending = false;
                }
                None => warn!(name, "unknown voice, keeping the current one"),
            }
        }
        self.player.set_parameters(params);
    }

    /// Sets the number of characters spoken per engine request, from the next
    /// [`speak`](Reader::speak) on.
    pub fn set_chunk_length(&mut self, chunk_length: NonZeroUsize) {
        self.chunk_length = chunk_length;
    }

    /// Reads the text from the beginning. See [`ChunkPlayer::start`].
    pub fn speak(&mut self) -> Result<()> {
        if self.preselect_pending && !self.player.status().is_active() {
            self.preselect_pending = false;
            self.preselect_voice();
        }
        self.player.start(&self.text, self.chunk_length)
    }

    /// See [`ChunkPlayer::pause`].
    pub fn pause(&self) -> bool {
        self.player.pause()
    }

    /// See [`ChunkPlayer::resume`].
    pub fn resume(&self) -> bool {
        self.player.resume()
    }

    /// See [`ChunkPlayer::stop`].
    pub fn stop(&self) {
        self.player.stop()
    }

    /// The current playback status.
    pub fn status(&self) -> PlaybackStatus {
        self.player.status()
    }

    /// Fraction of the text handed to the engine so far.
    pub fn progress(&self) -> f64 {
        self.player.progress()
    }

    fn preselect_voice(&self) {
        let Some(detection) = &self.detection else {
            return;
        };
        match self.preference.pick(&self.voices, &detection.tag) {
            Some(voice) => {
                debug!(voice = %voice.name, tag = %detection.tag, "voice preselected");
                self.use_voice(Some(voice.clone()));
            }
            None => debug!(tag = %detection.tag, "no voice for detected language"),
        }
    }

    fn use_voice(&self, voice: Option<VoiceDescriptor>) {
        let mut params = self.player.parameters();
        params.voice = voice;
        self.player.set_parameters(params);
    }
}
