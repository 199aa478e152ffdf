use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info, trace, warn};

use crate::tts::{
    lock, ChunkStep, ChunkTicket, PlaybackStatus, PlayerState, SpeechEngine, SpeechParams,
    Utterance, UtteranceEvent, DEFAULT_CHUNK_DELAY,
};
use crate::{Error, Result};

enum ChunkOutcome {
    Finished,
    Interrupted,
}

/// Abandons the read-through if the [`AsyncPlayer::play`] future is dropped before it ends.
struct PlayGuard<'p, E: SpeechEngine + 'static> {
    player: &'p AsyncPlayer<E>,
    generation: u64,
    armed: bool,
}

impl<E: SpeechEngine + 'static> PlayGuard<'_, E> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<E: SpeechEngine + 'static> Drop for PlayGuard<'_, E> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let abandoned = {
            let mut state = self.player.lock();
            let live = state.session.generation() == self.generation
                && state.session.status().is_active();
            if live {
                state.session.stop();
            }
            live
        };
        if abandoned {
            warn!(generation = self.generation, "playback dropped mid-flight, stopping");
            self.player.engine.cancel();
        }
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "tokio-tts")))]
/// A chunked player whose read-through can be awaited.
///
/// [`play`](AsyncPlayer::play) drives the whole read-through and completes when it ends. The
/// other methods take `&self`, so they can be called from other tasks while `play` is pending.
pub struct AsyncPlayer<E> {
    engine: Arc<E>,
    chunk_delay: Duration,
    state: Mutex<PlayerState>,
    interrupt: Notify,
}

impl<E: SpeechEngine + 'static> AsyncPlayer<E> {
    /// Creates an idle player that waits [`DEFAULT_CHUNK_DELAY`] between chunks.
    pub fn new(engine: Arc<E>) -> Self {
        Self::with_chunk_delay(engine, DEFAULT_CHUNK_DELAY)
    }

    /// Creates an idle player with the given delay between chunks.
    pub fn with_chunk_delay(engine: Arc<E>, chunk_delay: Duration) -> Self {
        Self {
            engine,
            chunk_delay,
            state: Mutex::new(PlayerState::new()),
            interrupt: Notify::new(),
        }
    }

    /// Reads the text from the beginning and completes when the read-through ends, with
    /// [`PlaybackStatus::Completed`] if the whole text was spoken, or with the status left behind
    /// by [`stop`](AsyncPlayer::stop).
    ///
    /// `on_progress` is called at the start of every chunk and with 1.0 on completion.
    ///
    /// Dropping the future before it completes stops the read-through, as if by
    /// [`stop`](AsyncPlayer::stop).
    ///
    /// Fails with [`Error::AlreadySpeaking`] or [`Error::EmptyInput`] without starting, and with
    /// [`Error::SynthesisFailure`] if the engine fails a chunk.
    pub async fn play<F: FnMut(f64)>(
        &self,
        text: &str,
        chunk_length: NonZeroUsize,
        mut on_progress: F,
    ) -> Result<PlaybackStatus> {
        if self.engine.is_speaking() {
            warn!("playback rejected, engine is speaking");
            return Err(Error::AlreadySpeaking);
        }
        let generation = {
            let mut state = self.lock();
            state.session.begin(text, chunk_length)?;
            state.session.generation()
        };
        info!(generation, chunk_length = chunk_length.get(), "playback started");

        let guard = PlayGuard {
            player: self,
            generation,
            armed: true,
        };
        let result = self.drive(generation, &mut on_progress).await;
        guard.disarm();
        result
    }

    async fn drive<F: FnMut(f64)>(
        &self,
        generation: u64,
        on_progress: &mut F,
    ) -> Result<PlaybackStatus> {
        loop {
            let (step, params) = {
                let mut state = self.lock();
                (state.session.next_step(generation), state.params.clone())
            };

            match step {
                ChunkStep::Speak { ticket, text } => {
                    trace!(cursor = ticket.cursor(), "speaking chunk");
                    let utterance = params.utterance(text);
                    match self.speak_chunk(ticket, utterance, on_progress).await? {
                        ChunkOutcome::Finished => tokio::time::sleep(self.chunk_delay).await,
                        ChunkOutcome::Interrupted => return Ok(self.status()),
                    }
                }
                ChunkStep::Completed => {
                    info!(generation, "playback completed");
                    on_progress(1.0);
                    return Ok(PlaybackStatus::Completed);
                }
                ChunkStep::Parked => {
                    debug!(generation, "waiting for resume");
                    self.interrupt.notified().await;
                }
                ChunkStep::Inactive => return Ok(self.status()),
            }
        }
    }

    /// Pauses the engine. Does nothing unless speaking.
    pub fn pause(&self) -> bool {
        let paused = self.lock().session.pause();
        if paused {
            debug!("playback paused");
            self.engine.pause();
        }
        paused
    }

    /// Resumes the engine. Does nothing unless paused.
    pub fn resume(&self) -> bool {
        let resumed = {
            let mut state = self.lock();
            let resumed = state.session.resume();
            if resumed {
                state.session.take_parked();
            }
            resumed
        };
        if resumed {
            debug!("playback resumed");
            self.engine.resume();
            self.interrupt.notify_one();
        }
        resumed
    }

    /// Stops playback and rewinds to the beginning of the text. A pending
    /// [`play`](AsyncPlayer::play) completes with the resulting status.
    pub fn stop(&self) {
        let status = self.lock().session.stop();
        self.engine.cancel();
        self.interrupt.notify_one();
        debug!(%status, "playback stopped");
    }

    /// Sets the voice settings used for the chunks spoken from now on.
    pub fn set_parameters(&self, params: SpeechParams) {
        self.lock().params = params;
    }

    /// Returns the voice settings chunks are spoken with.
    pub fn parameters(&self) -> SpeechParams {
        self.lock().params.clone()
    }

    /// Returns the current playback status.
    pub fn status(&self) -> PlaybackStatus {
        self.lock().session.status()
    }

    /// Returns the fraction of the text handed to the engine so far.
    pub fn progress(&self) -> f64 {
        self.lock().session.progress()
    }

    async fn speak_chunk<F: FnMut(f64)>(
        &self,
        ticket: ChunkTicket,
        utterance: Utterance,
        on_progress: &mut F,
    ) -> Result<ChunkOutcome> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = move |event: UtteranceEvent| {
            let _ = tx.send(event);
        };
        if let Err(err) = self.engine.speak(utterance, Box::new(handler)) {
            return self.fail(ticket, err);
        }

        loop {
            let woken = tokio::select! {
                event = rx.recv() => Some(event),
                _ = self.interrupt.notified() => None,
            };
            let event = match woken {
                Some(Some(event)) => event,
                Some(None) => UtteranceEvent::Failed("engine dropped the utterance".to_owned()),
                None => {
                    let current = self.lock().session.is_current(ticket);
                    if current {
                        continue;
                    }
                    trace!(?ticket, "chunk interrupted");
                    return Ok(ChunkOutcome::Interrupted);
                }
            };

            match event {
                UtteranceEvent::Started => {
                    let progress = self.lock().session.chunk_started(ticket);
                    if let Some(progress) = progress {
                        on_progress(progress);
                    }
                }
                UtteranceEvent::Finished => {
                    let finished = self.lock().session.chunk_finished(ticket);
                    return Ok(if finished {
                        ChunkOutcome::Finished
                    } else {
                        ChunkOutcome::Interrupted
                    });
                }
                UtteranceEvent::Failed(reason) => {
                    return self.fail(ticket, Error::SynthesisFailure(reason));
                }
            }
        }
    }

    fn fail(&self, ticket: ChunkTicket, err: Error) -> Result<ChunkOutcome> {
        let failed = self.lock().session.chunk_failed(ticket);
        if failed {
            error!(%err, cursor = ticket.cursor(), "speech synthesis error");
            Err(err)
        } else {
            trace!(?ticket, %err, "ignoring stale error notification");
            Ok(ChunkOutcome::Interrupted)
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        lock(&self.state)
    }
}
