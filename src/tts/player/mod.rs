use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::tts::{
    ChunkStep, ChunkTicket, PlaybackSession, PlaybackStatus, SpeechEngine, SpeechParams,
    UtteranceEvent,
};
use crate::{Error, Result};

mod listener;

pub use listener::{PlaybackListener, Scheduler, ThreadScheduler};

/// The delay between one chunk's end notification and the request for the next chunk. Some
/// engines drop a request issued right after the previous utterance ended.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(100);

pub(crate) struct PlayerState {
    pub(crate) session: PlaybackSession,
    pub(crate) params: SpeechParams,
}

impl PlayerState {
    pub(crate) fn new() -> Self {
        Self {
            session: PlaybackSession::new(),
            params: SpeechParams::default(),
        }
    }
}

pub(crate) fn lock(state: &Mutex<PlayerState>) -> MutexGuard<'_, PlayerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads text of any length through an engine that speaks one bounded utterance at a time.
///
/// The player splits the text into chunks of a fixed number of characters and hands them to the
/// engine one by one, waiting for each chunk's end notification (plus a short delay) before
/// requesting the next. Engine notifications and scheduled continuations that belong to a stopped
/// or restarted read-through are ignored.
pub struct ChunkPlayer<E: SpeechEngine + 'static> {
    shared: Arc<Shared<E>>,
}

struct Shared<E> {
    engine: Arc<E>,
    scheduler: Arc<dyn Scheduler>,
    listener: Arc<dyn PlaybackListener>,
    chunk_delay: Duration,
    state: Mutex<PlayerState>,
}

impl<E: SpeechEngine + 'static> ChunkPlayer<E> {
    /// Creates an idle player that waits [`DEFAULT_CHUNK_DELAY`] between chunks.
    pub fn new(
        engine: Arc<E>,
        scheduler: Arc<dyn Scheduler>,
        listener: Arc<dyn PlaybackListener>,
    ) -> Self {
        Self::with_chunk_delay(engine, scheduler, listener, DEFAULT_CHUNK_DELAY)
    }

    /// Creates an idle player with the given delay between chunks.
    pub fn with_chunk_delay(
        engine: Arc<E>,
        scheduler: Arc<dyn Scheduler>,
        listener: Arc<dyn PlaybackListener>,
        chunk_delay: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                engine,
                scheduler,
                listener,
                chunk_delay,
                state: Mutex::new(PlayerState::new()),
            }),
        }
    }

    /// Starts reading the text from the beginning.
    ///
    /// Rejected with [`Error::AlreadySpeaking`] while the engine is speaking or a read-through is
    /// still active, and with [`Error::EmptyInput`] for blank text. A rejected start leaves the
    /// current read-through untouched. Errors are also reported to the listener.
    pub fn start(&self, text: &str, chunk_length: NonZeroUsize) -> Result<()> {
        let shared = &self.shared;
        let begun = if shared.engine.is_speaking() {
            Err(Error::AlreadySpeaking)
        } else {
            let mut state = shared.lock();
            state.session.begin(text, chunk_length).map(|_| state.session.generation())
        };

        match begun {
            Ok(generation) => {
                info!(generation, chunk_length = chunk_length.get(), "playback started");
                shared.listener.on_status(PlaybackStatus::Speaking);
                Shared::advance(shared, generation);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "playback rejected");
                shared.listener.on_error(&err);
                Err(err)
            }
        }
    }

    /// Pauses the engine. Does nothing unless speaking.
    pub fn pause(&self) -> bool {
        let paused = self.shared.lock().session.pause();
        if paused {
            debug!("playback paused");
            self.shared.engine.pause();
            self.shared.listener.on_status(PlaybackStatus::Paused);
        }
        paused
    }

    /// Resumes the engine. Does nothing unless paused.
    pub fn resume(&self) -> bool {
        let (resumed, parked, generation) = {
            let mut state = self.shared.lock();
            let resumed = state.session.resume();
            (resumed, resumed && state.session.take_parked(), state.session.generation())
        };
        if resumed {
            debug!(parked, "playback resumed");
            self.shared.engine.resume();
            self.shared.listener.on_status(PlaybackStatus::Speaking);
            if parked {
                Shared::advance(&self.shared, generation);
            }
        }
        resumed
    }

    /// Stops playback and rewinds to the beginning of the text.
    ///
    /// The engine is cancelled even if the player believes nothing is playing.
    pub fn stop(&self) {
        // Reset first, so notifications triggered by the cancel are already stale.
        let status = self.shared.lock().session.stop();
        self.shared.engine.cancel();
        debug!(%status, "playback stopped");
        self.shared.listener.on_status(status);
    }

    /// Sets the voice settings used for the chunks spoken from now on.
    pub fn set_parameters(&self, params: SpeechParams) {
        self.shared.lock().params = params;
    }

    /// Returns the voice settings chunks are spoken with.
    pub fn parameters(&self) -> SpeechParams {
        self.shared.lock().params.clone()
    }

    /// Returns the current playback status.
    pub fn status(&self) -> PlaybackStatus {
        self.shared.lock().session.status()
    }

    /// Returns the fraction of the text handed to the engine so far.
    pub fn progress(&self) -> f64 {
        self.shared.lock().session.progress()
    }
}

impl<E: SpeechEngine + 'static> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        lock(&self.state)
    }

    fn advance(this: &Arc<Self>, generation: u64) {
        let (step, params) = {
            let mut state = this.lock();
            let step = state.session.next_step(generation);
            (step, state.params.clone())
        };

        match step {
            ChunkStep::Speak { ticket, text } => {
                trace!(cursor = ticket.cursor(), chars = text.chars().count(), "speaking chunk");
                let handler = {
                    let shared = Arc::downgrade(this);
                    move |event: UtteranceEvent| {
                        if let Some(shared) = shared.upgrade() {
                            Shared::on_event(&shared, ticket, event);
                        }
                    }
                };
                if let Err(err) = this.engine.speak(params.utterance(text), Box::new(handler)) {
                    this.fail(ticket, err);
                }
            }
            ChunkStep::Completed => {
                info!(generation, "playback completed");
                this.listener.on_progress(1.0);
                this.listener.on_status(PlaybackStatus::Completed);
            }
            ChunkStep::Parked => debug!(generation, "chunk loop parked until resume"),
            ChunkStep::Inactive => trace!(generation, "ignoring stale continuation"),
        }
    }

    fn on_event(this: &Arc<Self>, ticket: ChunkTicket, event: UtteranceEvent) {
        match event {
            UtteranceEvent::Started => {
                let progress = this.lock().session.chunk_started(ticket);
                match progress {
                    Some(progress) => this.listener.on_progress(progress),
                    None => trace!(?ticket, "ignoring stale start notification"),
                }
            }
            UtteranceEvent::Finished => {
                let finished = this.lock().session.chunk_finished(ticket);
                if !finished {
                    trace!(?ticket, "ignoring stale end notification");
                    return;
                }
                let generation = ticket.generation();
                let shared = Arc::downgrade(this);
                this.scheduler.schedule(
                    this.chunk_delay,
                    Box::new(move || {
                        if let Some(shared) = shared.upgrade() {
                            Shared::advance(&shared, generation);
                        }
                    }),
                );
            }
            UtteranceEvent::Failed(reason) => this.fail(ticket, Error::SynthesisFailure(reason)),
        }
    }

    fn fail(&self, ticket: ChunkTicket, err: Error) {
        let failed = self.lock().session.chunk_failed(ticket);
        if !failed {
            trace!(?ticket, %err, "ignoring stale error notification");
            return;
        }
        error!(%err, cursor = ticket.cursor(), "speech synthesis error");
        self.listener.on_error(&err);
        self.listener.on_status(PlaybackStatus::Failed);
    }
}
