//! Support for async playback running on Tokio.

#[cfg(feature = "tokio-rt")]
mod rt;
#[cfg(feature = "tokio-tts")]
mod tts;

#[cfg(feature = "tokio-tts")]
pub use tts::AsyncPlayer;
