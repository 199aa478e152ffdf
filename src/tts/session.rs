use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

use crate::{Error, Result};

/// The playback state reported to the UI.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, Display, IntoStaticStr, Serialize, Deserialize,
)]
pub enum PlaybackStatus {
    /// Nothing is playing.
    Idle,
    /// A chunk is being spoken, or the next one is about to be.
    Speaking,
    /// Playback is paused and can be resumed.
    Paused,
    /// The whole text has been spoken.
    Completed,
    /// The engine failed to render a chunk.
    Failed,
}

impl PlaybackStatus {
    /// Returns `true` while a session holds the engine, i.e. when speaking or paused.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Speaking | Self::Paused)
    }
}

/// Identifies the chunk a notification belongs to.
///
/// A ticket is only honored while its session is current and still waiting on that very chunk,
/// so notifications that outlive a stopped or restarted session are ignored.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ChunkTicket {
    generation: u64,
    cursor: usize,
}

impl ChunkTicket {
    /// The session generation the chunk was issued by.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The character offset the chunk starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// What the chunk loop should do next.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ChunkStep {
    /// Speak the given text; route its notifications with the ticket.
    Speak {
        /// Identifies the chunk in notifications.
        ticket: ChunkTicket,
        /// The chunk text.
        text: String,
    },
    /// The text is exhausted and the session has just completed.
    Completed,
    /// The session is paused; the loop must be re-entered on resume.
    Parked,
    /// The continuation belongs to a session that is no longer playing.
    Inactive,
}

/// The state of one read-through of a text.
///
/// Offsets are counted in `char`s. A chunk boundary may fall inside a word; the session never
/// looks for a better place to split.
#[derive(Debug)]
pub struct PlaybackSession {
    text: String,
    len: usize,
    cursor: usize,
    cursor_byte: usize,
    chunk_end_byte: usize,
    chunk_length: NonZeroUsize,
    status: PlaybackStatus,
    generation: u64,
    in_flight: bool,
    parked: bool,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            len: 0,
            cursor: 0,
            cursor_byte: 0,
            chunk_end_byte: 0,
            chunk_length: NonZeroUsize::MIN,
            status: PlaybackStatus::Idle,
            generation: 0,
            in_flight: false,
            parked: false,
        }
    }

    /// The text being read, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The length of the text in `char`s.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there is no text loaded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The character offset of the next chunk to be spoken.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The number of characters spoken per engine request.
    pub fn chunk_length(&self) -> NonZeroUsize {
        self.chunk_length
    }

    /// The current playback status.
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// The generation of the current read-through. Bumped by every start and stop.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fraction of the text already handed to the engine, in [0, 1]. Exactly 1 once completed.
    pub fn progress(&self) -> f64 {
        if self.status == PlaybackStatus::Completed {
            return 1.0;
        }
        if self.len == 0 {
            return 0.0;
        }
        (self.cursor as f64 / self.len as f64).min(1.0)
    }

    /// Starts reading the given text from the beginning.
    ///
    /// Fails without touching the session if it is still active or if the text is blank.
    pub fn begin(&mut self, text: &str, chunk_length: NonZeroUsize) -> Result<()> {
        if self.status.is_active() {
            return Err(Error::AlreadySpeaking);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        self.text = text.to_owned();
        self.len = self.text.chars().count();
        self.cursor = 0;
        self.cursor_byte = 0;
        self.chunk_end_byte = 0;
        self.chunk_length = chunk_length;
        self.status = PlaybackStatus::Speaking;
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = false;
        self.parked = false;
        Ok(())
    }

    /// Runs one iteration of the chunk loop for the given generation.
    pub fn next_step(&mut self, generation: u64) -> ChunkStep {
        if generation != self.generation || self.in_flight {
            return ChunkStep::Inactive;
        }
        match self.status {
            PlaybackStatus::Speaking => {}
            PlaybackStatus::Paused => {
                self.parked = true;
                return ChunkStep::Parked;
            }
            _ => return ChunkStep::Inactive,
        }

        let end = self.chunk_end();
        if end == self.cursor_byte {
            self.status = PlaybackStatus::Completed;
            return ChunkStep::Completed;
        }
        let text = self.text[self.cursor_byte..end].to_owned();

        self.chunk_end_byte = end;
        self.in_flight = true;
        ChunkStep::Speak {
            ticket: ChunkTicket {
                generation: self.generation,
                cursor: self.cursor,
            },
            text,
        }
    }

    /// Returns `true` if the ticket belongs to the chunk the session is waiting on.
    pub fn is_current(&self, ticket: ChunkTicket) -> bool {
        self.in_flight
            && self.status.is_active()
            && ticket.generation == self.generation
            && ticket.cursor == self.cursor
    }

    /// Handles the engine's start notification. Returns the progress to report, or `None` for a
    /// stale ticket.
    pub fn chunk_started(&self, ticket: ChunkTicket) -> Option<f64> {
        self.is_current(ticket).then(|| self.progress())
    }

    /// Handles the engine's end notification by moving past the chunk. Returns `false` for a stale
    /// ticket, in which case nothing changes.
    pub fn chunk_finished(&mut self, ticket: ChunkTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = false;
        self.cursor = self.cursor.saturating_add(self.chunk_length.get()).min(self.len);
        self.cursor_byte = self.chunk_end_byte;
        true
    }

    /// Handles the engine's error notification by failing the session. Returns `false` for a stale
    /// ticket, in which case nothing changes.
    pub fn chunk_failed(&mut self, ticket: ChunkTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = false;
        self.parked = false;
        self.status = PlaybackStatus::Failed;
        true
    }

    /// Pauses a speaking session. Returns `false` in any other state.
    pub fn pause(&mut self) -> bool {
        if self.status != PlaybackStatus::Speaking {
            return false;
        }
        self.status = PlaybackStatus::Paused;
        true
    }

    /// Resumes a paused session. Returns `false` in any other state.
    pub fn resume(&mut self) -> bool {
        if self.status != PlaybackStatus::Paused {
            return false;
        }
        self.status = PlaybackStatus::Speaking;
        true
    }

    /// Returns `true`, once, if the chunk loop parked while paused and has to be re-entered.
    pub fn take_parked(&mut self) -> bool {
        std::mem::take(&mut self.parked)
    }

    /// Abandons the read-through. The cursor goes back to 0 and every outstanding ticket becomes
    /// stale. A completed session stays completed, anything else becomes idle.
    pub fn stop(&mut self) -> PlaybackStatus {
        self.generation = self.generation.wrapping_add(1);
        self.cursor = 0;
        self.cursor_byte = 0;
        self.chunk_end_byte = 0;
        self.in_flight = false;
        self.parked = false;
        if self.status != PlaybackStatus::Completed {
            self.status = PlaybackStatus::Idle;
        }
        self.status
    }

    /// The byte offset where the chunk starting at the cursor ends. Only the chunk itself is
    /// scanned.
    fn chunk_end(&self) -> usize {
        let rest = &self.text[self.cursor_byte..];
        let chunk_bytes = rest
            .char_indices()
            .nth(self.chunk_length.get())
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());
        self.cursor_byte + chunk_bytes
    }
}
