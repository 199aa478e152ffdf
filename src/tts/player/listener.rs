use std::time::Duration;

use crate::tts::PlaybackStatus;
use crate::Error;

/// The UI surface a player reports to. Every method has an empty default, so implementors only
/// override what they render.
pub trait PlaybackListener: Send + Sync {
    /// Called whenever the playback status changes.
    fn on_status(&self, _status: PlaybackStatus) {}

    /// Called at the start of every chunk, and with 1.0 on completion.
    fn on_progress(&self, _progress: f64) {}

    /// Called for every error that ends or rejects playback.
    fn on_error(&self, _error: &Error) {}
}

impl PlaybackListener for () {}

/// Runs deferred work for the callback-driven player.
pub trait Scheduler: Send + Sync {
    /// Runs the task once the delay has elapsed, never from inside this call.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>);
}

/// A [`Scheduler`] that sleeps on a freshly spawned thread for every task.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            task();
        });
    }
}
