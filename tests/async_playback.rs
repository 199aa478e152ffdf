#![cfg(any(feature = "tokio-rt", feature = "tokio-tts"))]

mod common;

use std::num::NonZeroUsize;
use std::time::Duration;

use common::FakeEngine;

const TEXT: &str = "Hello world, this is a test.";

fn length(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

async fn wait_for_chunk(engine: &FakeEngine, count: usize) {
    while engine.spoken_texts().len() < count || !engine.has_current() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[cfg(feature = "tokio-tts")]
mod awaited {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use reader_lite::tokio::AsyncPlayer;
    use reader_lite::tts::{PlaybackStatus, Rate, SpeechEngine, SpeechParams, UtteranceEvent};
    use reader_lite::Error;

    use super::common::FakeEngine;
    use super::{length, wait_for_chunk, TEXT};

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_completion() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::new(engine.clone()));
        let progress = Arc::new(Mutex::new(Vec::new()));

        let task = {
            let player = player.clone();
            let progress = progress.clone();
            tokio::spawn(async move {
                player
                    .play(TEXT, length(10), move |p| progress.lock().unwrap().push(p))
                    .await
            })
        };

        for count in 1..=3 {
            wait_for_chunk(&engine, count).await;
            engine.start_current();
            engine.finish_current();
        }

        assert_eq!(task.await.unwrap().unwrap(), PlaybackStatus::Completed);
        assert_eq!(engine.spoken_texts(), vec!["Hello worl", "d, this is", " a test."]);
        assert_eq!(
            *progress.lock().unwrap(),
            vec![0.0, 10.0 / 28.0, 20.0 / 28.0, 1.0]
        );
        assert_eq!(player.status(), PlaybackStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_play() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::new(engine.clone()));
        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play(TEXT, length(10), |_| {}).await })
        };

        wait_for_chunk(&engine, 1).await;
        player.stop();

        assert_eq!(task.await.unwrap().unwrap(), PlaybackStatus::Idle);
        assert_eq!(engine.cancel_count(), 1);
        assert_eq!(player.progress(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_play_stops_playback() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::new(engine.clone()));
        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play(TEXT, length(10), |_| {}).await })
        };

        wait_for_chunk(&engine, 1).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(player.status(), PlaybackStatus::Idle);
        assert_eq!(player.progress(), 0.0);
        assert_eq!(engine.cancel_count(), 1);
        assert!(!engine.is_speaking());

        // A late end notification of the dropped chunk changes nothing.
        engine.notify_canceled(UtteranceEvent::Finished);
        assert_eq!(player.status(), PlaybackStatus::Idle);

        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play("Short text.", length(200), |_| {}).await })
        };
        wait_for_chunk(&engine, 2).await;
        engine.finish_current();
        assert_eq!(task.await.unwrap().unwrap(), PlaybackStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_play_leaves_engine_alone() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::new(engine.clone()));
        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play("Short text.", length(200), |_| {}).await })
        };

        wait_for_chunk(&engine, 1).await;
        engine.finish_current();
        assert_eq!(task.await.unwrap().unwrap(), PlaybackStatus::Completed);
        assert_eq!(engine.cancel_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_between_chunks() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::new(engine.clone()));
        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play(TEXT, length(10), |_| {}).await })
        };

        wait_for_chunk(&engine, 1).await;
        engine.finish_current();
        assert!(player.pause());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(engine.spoken_texts().len(), 1);
        assert_eq!(player.status(), PlaybackStatus::Paused);

        assert!(player.resume());
        wait_for_chunk(&engine, 2).await;
        player.stop();
        assert_eq!(task.await.unwrap().unwrap(), PlaybackStatus::Idle);
        assert_eq!(engine.spoken_texts(), vec!["Hello worl", "d, this is"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_mid_chunk() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::with_chunk_delay(engine.clone(), Duration::ZERO));
        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play("Short text.", length(200), |_| {}).await })
        };

        wait_for_chunk(&engine, 1).await;
        assert!(player.pause());
        assert!(engine.is_paused());
        assert!(player.resume());
        assert!(!engine.is_paused());
        engine.finish_current();

        assert_eq!(task.await.unwrap().unwrap(), PlaybackStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_failure() {
        let engine = FakeEngine::new();
        let player = Arc::new(AsyncPlayer::new(engine.clone()));
        player.set_parameters(SpeechParams {
            rate: Rate::new(0.5),
            ..SpeechParams::default()
        });
        let task = {
            let player = player.clone();
            tokio::spawn(async move { player.play(TEXT, length(10), |_| {}).await })
        };

        wait_for_chunk(&engine, 1).await;
        assert_eq!(engine.last_utterance().unwrap().rate, Rate::new(0.5));
        engine.fail_current("synthesis-failed");

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::SynthesisFailure(reason) if reason == "synthesis-failed"));
        assert_eq!(player.status(), PlaybackStatus::Failed);
    }

    #[tokio::test]
    async fn test_rejects_busy_engine_and_blank_text() {
        let engine = FakeEngine::new();
        let player = AsyncPlayer::new(engine.clone());

        let err = player.play("   ", length(10), |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput));

        engine.set_speaking(true);
        let err = player.play(TEXT, length(10), |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::AlreadySpeaking));
        assert_eq!(player.status(), PlaybackStatus::Idle);
        assert!(engine.spoken_texts().is_empty());
    }
}

#[cfg(feature = "tokio-rt")]
mod scheduled {
    use std::sync::Arc;

    use reader_lite::tts::{ChunkPlayer, PlaybackStatus};
    use tokio::runtime::Handle;

    use super::common::{FakeEngine, RecordingListener};
    use super::{length, wait_for_chunk, TEXT};

    #[tokio::test(start_paused = true)]
    async fn test_runtime_handle_schedules_chunks() {
        let engine = FakeEngine::new();
        let listener = RecordingListener::new();
        let scheduler = Arc::new(Handle::current());
        let player = ChunkPlayer::new(engine.clone(), scheduler, listener.clone());
        player.start(TEXT, length(10)).unwrap();

        for count in 1..=3 {
            wait_for_chunk(&engine, count).await;
            engine.finish_current();
        }
        while player.status() == PlaybackStatus::Speaking {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(player.status(), PlaybackStatus::Completed);
        assert_eq!(listener.statuses().last(), Some(&PlaybackStatus::Completed));
    }
}
