use std::io;

/// The error type returned by reader functions and methods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Playback was requested while the engine or the player is still speaking.
    #[error("already speaking, wait or stop the current speech")]
    AlreadySpeaking,

    /// Playback was requested with empty or whitespace-only text.
    #[error("there is no text to speak")]
    EmptyInput,

    /// The speech engine reported an error while rendering an utterance.
    #[error("speech synthesis failed: {0}")]
    SynthesisFailure(String),

    /// The text source could not be read as UTF-8 text.
    #[error("unable to read the text source")]
    UnreadableFile(#[source] io::Error),

    /// A language signature was built from a malformed pattern.
    #[error("invalid pattern in language signature `{tag}`")]
    InvalidPattern {
        /// The language tag of the offending signature.
        tag: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The reader settings contain an unusable value.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A reading goal outside the accepted range was requested.
    #[error("reading goal must be between 1 and {max} minutes, got {minutes}")]
    InvalidGoal {
        /// The requested goal.
        minutes: u32,
        /// The largest accepted goal.
        max: u32,
    },
}

/// The type returned by reader functions and methods.
pub type Result<T> = std::result::Result<T, Error>;
