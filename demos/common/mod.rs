//! A stand-in speech engine that "speaks" by printing each utterance and sleeping for about as
//! long as reading it aloud would take.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use reader_lite::tts::{
    SpeechEngine, Utterance, UtteranceEvent, UtteranceHandler, VoiceDescriptor,
};
use reader_lite::Result;

const MILLIS_PER_CHAR: f32 = 40.0;

#[derive(Default)]
pub struct ConsoleEngine {
    state: Arc<Mutex<ConsoleState>>,
}

#[derive(Default)]
struct ConsoleState {
    utterance: u64,
    speaking: bool,
}

impl SpeechEngine for ConsoleEngine {
    fn speak(&self, utterance: Utterance, handler: Box<dyn UtteranceHandler>) -> Result<()> {
        let id = {
            let mut state = self.state.lock().unwrap();
            state.utterance += 1;
            state.speaking = true;
            state.utterance
        };
        let voice = utterance.voice.map_or_else(|| "default".to_owned(), |voice| voice.name);
        let chars = utterance.text.chars().count() as f32;
        let millis = chars * MILLIS_PER_CHAR / utterance.rate.value();
        let state = self.state.clone();

        thread::spawn(move || {
            handler.on_event(UtteranceEvent::Started);
            println!("[{}] {}", voice, utterance.text);
            thread::sleep(Duration::from_millis(millis as u64));

            let current = {
                let mut state = state.lock().unwrap();
                let current = state.utterance == id;
                if current {
                    state.speaking = false;
                }
                current
            };
            if current {
                handler.on_event(UtteranceEvent::Finished);
            } else {
                handler.on_event(UtteranceEvent::Failed("canceled".to_owned()));
            }
        });
        Ok(())
    }

    fn pause(&self) {
        println!("(paused)");
    }

    fn resume(&self) {
        println!("(resumed)");
    }

    fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.utterance += 1;
        state.speaking = false;
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().unwrap().speaking
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Samantha", "en-US").default_voice(),
            VoiceDescriptor::new("Thomas", "fr-FR"),
            VoiceDescriptor::new("Amélie Premium", "fr-CA"),
            VoiceDescriptor::new("Anna", "de-DE"),
            VoiceDescriptor::new("Google español Female", "es-ES").remote(),
        ]
    }
}
