//! Text sources and statistics.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Word and character counts of a text, as shown next to the input.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct TextStats {
    /// Whitespace-separated words.
    pub words: usize,
    /// Characters, including whitespace.
    pub chars: usize,
}

impl TextStats {
    /// Counts the words and characters of the text.
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }
}

/// Reads a whole text source, such as an uploaded plain-text file, into a string.
///
/// Fails with [`Error::UnreadableFile`] if reading fails or the content is not UTF-8.
pub fn read_text<R: Read>(mut source: R) -> Result<String> {
    let mut text = String::new();
    source.read_to_string(&mut text).map_err(Error::UnreadableFile)?;
    Ok(text)
}
