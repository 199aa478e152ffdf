//! Chunked playback of long texts through a platform speech engine.
//!
//! The engine is abstracted by [`SpeechEngine`]. [`PlaybackSession`] holds the state machine that
//! decides which chunk to speak next, and [`ChunkPlayer`] drives it from the engine's
//! notifications.

mod engine;
mod player;
mod session;
mod utterance;
mod voice;

pub use self::engine::{SpeechEngine, UtteranceEvent, UtteranceHandler};
pub use self::player::{
    ChunkPlayer, PlaybackListener, Scheduler, ThreadScheduler, DEFAULT_CHUNK_DELAY,
};
pub use self::session::{ChunkStep, ChunkTicket, PlaybackSession, PlaybackStatus};
pub use self::utterance::{Pitch, Rate, SpeechParams, Utterance, Volume};
pub use self::voice::{
    primary_subtag, VoiceDescriptor, VoiceGender, VoicePreference, VoiceSelector,
};

#[cfg(feature = "tokio-tts")]
pub(crate) use self::player::{lock, PlayerState};
