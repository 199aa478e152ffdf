use crate::Result;

use super::{Utterance, VoiceDescriptor};

/// A notification the engine delivers for an utterance it accepted.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UtteranceEvent {
    /// The engine started rendering the utterance.
    Started,
    /// The engine finished rendering the utterance.
    Finished,
    /// The engine gave up on the utterance. Carries the engine's description of the failure.
    Failed(String),
}

/// The handler a [`SpeechEngine`] calls with the notifications for one utterance.
pub trait UtteranceHandler: Send + Sync {
    /// Called by the engine, after [`speak`](SpeechEngine::speak) has returned, every time the
    /// state of the utterance changes.
    fn on_event(&self, event: UtteranceEvent);
}

impl<F: Fn(UtteranceEvent) + Send + Sync> UtteranceHandler for F {
    fn on_event(&self, event: UtteranceEvent) {
        self(event)
    }
}

/// The platform speech engine the player drives.
///
/// The engine only renders one bounded utterance per [`speak`](SpeechEngine::speak) call and
/// exposes pause, resume and cancel as global operations. Notifications must never be delivered
/// from inside the call that triggered them.
pub trait SpeechEngine: Send + Sync {
    /// Queues the utterance for rendering. The handler receives its notifications.
    fn speak(&self, utterance: Utterance, handler: Box<dyn UtteranceHandler>) -> Result<()>;

    /// Pauses rendering of the current utterance.
    fn pause(&self);

    /// Resumes rendering after [`pause`](SpeechEngine::pause).
    fn resume(&self);

    /// Drops the current utterance and everything queued behind it.
    fn cancel(&self);

    /// Returns `true` while the engine is rendering an utterance. New playback may only start
    /// while this is `false`.
    fn is_speaking(&self) -> bool;

    /// Returns the voices currently installed, in the engine's listing order.
    fn voices(&self) -> Vec<VoiceDescriptor>;
}
