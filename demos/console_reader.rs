//! Reads a text file (or a built-in sample) aloud through a console stand-in for a speech engine,
//! picking a voice for the text's language.
//!
//! Run with `RUST_LOG=reader_lite=debug` to see what the player is doing.

mod common;

use std::fs::File;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reader_lite::tts::{PlaybackListener, PlaybackStatus, ThreadScheduler};
use reader_lite::{Error, Reader, ReaderSettings};
use tracing_subscriber::EnvFilter;

use common::ConsoleEngine;

const SAMPLE: &str = "Nous sommes partis très tôt pour la plage avec les enfants. Le soleil est \
                      déjà haut et la mer est calme, parfaite pour une longue baignade.";

struct ProgressBar;

impl PlaybackListener for ProgressBar {
    fn on_status(&self, status: PlaybackStatus) {
        println!("-- {}", status);
    }

    fn on_progress(&self, progress: f64) {
        println!("-- {:>3.0}%", progress * 100.0);
    }

    fn on_error(&self, error: &Error) {
        eprintln!("-- error: {}", error);
    }
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = ReaderSettings {
        chunk_length: 60,
        ..ReaderSettings::default()
    };
    let mut reader = Reader::new(
        Arc::new(ConsoleEngine::default()),
        Arc::new(ThreadScheduler),
        Arc::new(ProgressBar),
        &settings,
    )
    .unwrap();

    // Read the file named on the command line, if any.
    match std::env::args().nth(1) {
        Some(path) => reader.load_text(File::open(path).unwrap()).unwrap(),
        None => reader.set_text(SAMPLE),
    }

    let stats = reader.text_stats();
    println!("{} words, {} characters", stats.words, stats.chars);
    if let Some(language) = reader.detected_language() {
        println!("Detected language: {}", language.display_name);
    }
    if let Some(voice) = reader.selected_voice() {
        println!("Speaking with: {}", voice.name);
    }

    reader.speak().unwrap();

    // Take a breather halfway through the first chunk.
    thread::sleep(Duration::from_millis(800));
    reader.pause();
    thread::sleep(Duration::from_secs(1));
    reader.resume();

    while reader.status().is_active() {
        thread::sleep(Duration::from_millis(50));
    }
}
