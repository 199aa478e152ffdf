#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Reads long texts aloud through a platform speech engine.
//!
//! # Features
//!
//! Platform speech engines (such as the speech synthesis built into web browsers) only cope with
//! a bounded amount of text per request, and only offer global pause, resume and cancel. This
//! crate builds a reader on top of such an engine. It does not synthesize speech itself.
//!
//! ## Text-to-speech
//!
//! The [tts] module splits a text into fixed-size chunks and feeds them to a [`SpeechEngine`] one
//! at a time, with play, pause, resume and stop on top and a coarse progress readout.
//!
//! To read a text, you first need an implementation of [`SpeechEngine`] for your platform. Then
//! create a [`ChunkPlayer`] for it, or a [`Reader`] if you also want language-based voice
//! selection. Which driver you choose will depend on whether your engine reports its progress
//! through callbacks or you want to await playback from async code (see the `tokio` module).
//!
//! Rate, pitch, volume and voice can be changed between chunks. The voices installed on the
//! engine can be filtered by language, name or gender with a [`VoiceSelector`].
//!
//! ## Language detection
//!
//! The [lang] module guesses the language of a text from frequent words and characters of
//! distinctive scripts. The [`Reader`] uses the guess to preselect a voice that speaks the
//! language.
//!
//! ## Reading goals
//!
//! The [goal] module tracks a listening goal: a number of minutes the user wants to spend
//! listening, counted down by the host.
//!
//! [`SpeechEngine`]: tts::SpeechEngine
//! [`ChunkPlayer`]: tts::ChunkPlayer
//! [`VoiceSelector`]: tts::VoiceSelector

mod error;
pub mod goal;
pub mod lang;
mod reader;
pub mod settings;
pub mod text;
pub mod tts;

#[cfg(any(feature = "tokio-rt", feature = "tokio-tts"))]
pub mod tokio;

pub use error::{Error, Result};
pub use reader::Reader;
pub use settings::ReaderSettings;
