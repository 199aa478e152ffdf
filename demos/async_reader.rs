//! Awaits a read-through on Tokio, stopping it early if it takes too long.

mod common;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use reader_lite::tokio::AsyncPlayer;
use reader_lite::tts::{Rate, SpeechParams};
use tracing_subscriber::EnvFilter;

use common::ConsoleEngine;

const TEXT: &str = "The quick brown fox jumps over the lazy dog. Pack my box with five dozen \
                    liquor jugs. How vexingly quick daft zebras jump!";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let player = Arc::new(AsyncPlayer::new(Arc::new(ConsoleEngine::default())));
    player.set_parameters(SpeechParams {
        rate: Rate::new(1.5),
        ..SpeechParams::default()
    });

    // Give up after five seconds.
    let stopper = {
        let player = player.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            player.stop();
        })
    };

    let chunk_length = NonZeroUsize::new(50).unwrap();
    let status = player
        .play(TEXT, chunk_length, |progress| println!("-- {:>3.0}%", progress * 100.0))
        .await
        .unwrap();
    println!("Finished: {}", status);

    stopper.abort();
}
