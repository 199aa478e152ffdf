#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reader_lite::tts::{
    PlaybackListener, PlaybackStatus, Scheduler, SpeechEngine, Utterance, UtteranceEvent,
    UtteranceHandler, VoiceDescriptor,
};
use reader_lite::{Error, Result};

/// An engine that records what it is asked to speak and lets the test deliver the
/// notifications by hand.
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<EngineState>,
}

#[derive(Default)]
struct EngineState {
    spoken: Vec<Utterance>,
    current: Option<Arc<dyn UtteranceHandler>>,
    canceled: Vec<Arc<dyn UtteranceHandler>>,
    speaking: bool,
    paused: bool,
    cancel_count: usize,
    voices: Vec<VoiceDescriptor>,
    reject_next: Option<String>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_voices(voices: Vec<VoiceDescriptor>) -> Arc<Self> {
        let engine = Self::default();
        engine.state.lock().unwrap().voices = voices;
        Arc::new(engine)
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.spoken.iter().map(|utterance| utterance.text.clone()).collect()
    }

    pub fn last_utterance(&self) -> Option<Utterance> {
        self.state.lock().unwrap().spoken.last().cloned()
    }

    pub fn has_current(&self) -> bool {
        self.state.lock().unwrap().current.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().unwrap().cancel_count
    }

    pub fn set_speaking(&self, speaking: bool) {
        self.state.lock().unwrap().speaking = speaking;
    }

    pub fn reject_next(&self, reason: &str) {
        self.state.lock().unwrap().reject_next = Some(reason.to_owned());
    }

    pub fn start_current(&self) {
        if let Some(handler) = self.current() {
            handler.on_event(UtteranceEvent::Started);
        }
    }

    /// Delivers the end notification of the current utterance.
    pub fn finish_current(&self) {
        let handler = {
            let mut state = self.state.lock().unwrap();
            state.speaking = false;
            state.current.take()
        };
        if let Some(handler) = handler {
            handler.on_event(UtteranceEvent::Finished);
        }
    }

    pub fn fail_current(&self, reason: &str) {
        let handler = {
            let mut state = self.state.lock().unwrap();
            state.speaking = false;
            state.current.take()
        };
        if let Some(handler) = handler {
            handler.on_event(UtteranceEvent::Failed(reason.to_owned()));
        }
    }

    /// Takes the handler of the current utterance without notifying it.
    pub fn take_current(&self) -> Option<Arc<dyn UtteranceHandler>> {
        self.state.lock().unwrap().current.take()
    }

    /// Delivers the late notifications of utterances dropped by `cancel`.
    pub fn notify_canceled(&self, event: UtteranceEvent) {
        let handlers = std::mem::take(&mut self.state.lock().unwrap().canceled);
        for handler in handlers {
            handler.on_event(event.clone());
        }
    }

    fn current(&self) -> Option<Arc<dyn UtteranceHandler>> {
        self.state.lock().unwrap().current.clone()
    }
}

impl SpeechEngine for FakeEngine {
    fn speak(&self, utterance: Utterance, handler: Box<dyn UtteranceHandler>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.reject_next.take() {
            return Err(Error::SynthesisFailure(reason));
        }
        state.spoken.push(utterance);
        state.current = Some(Arc::from(handler));
        state.speaking = true;
        Ok(())
    }

    fn pause(&self) {
        self.state.lock().unwrap().paused = true;
    }

    fn resume(&self) {
        self.state.lock().unwrap().paused = false;
    }

    fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.cancel_count += 1;
        state.speaking = false;
        state.paused = false;
        if let Some(handler) = state.current.take() {
            state.canceled.push(handler);
        }
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().unwrap().speaking
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.state.lock().unwrap().voices.clone()
    }
}

/// A scheduler that holds tasks until the test runs them.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<(Duration, Box<dyn FnOnce() + Send>)>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.tasks.lock().unwrap().iter().map(|(delay, _)| *delay).collect()
    }

    /// Runs every task scheduled so far, but not those they schedule in turn.
    pub fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap());
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        self.tasks.lock().unwrap().push((delay, task));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Status(PlaybackStatus),
    Progress(f64),
    Error(String),
}

/// A listener that records everything it is told.
#[derive(Default)]
pub struct RecordingListener {
    reports: Mutex<Vec<Report>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<PlaybackStatus> {
        self.filter(|report| match report {
            Report::Status(status) => Some(*status),
            _ => None,
        })
    }

    pub fn progress(&self) -> Vec<f64> {
        self.filter(|report| match report {
            Report::Progress(progress) => Some(*progress),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.filter(|report| match report {
            Report::Error(err) => Some(err.clone()),
            _ => None,
        })
    }

    fn filter<T, F: Fn(&Report) -> Option<T>>(&self, f: F) -> Vec<T> {
        self.reports.lock().unwrap().iter().filter_map(f).collect()
    }
}

impl PlaybackListener for RecordingListener {
    fn on_status(&self, status: PlaybackStatus) {
        self.reports.lock().unwrap().push(Report::Status(status));
    }

    fn on_progress(&self, progress: f64) {
        self.reports.lock().unwrap().push(Report::Progress(progress));
    }

    fn on_error(&self, error: &Error) {
        self.reports.lock().unwrap().push(Report::Error(error.to_string()));
    }
}
