use std::time::Duration;

use crate::tts::Scheduler;

/// Runs the callback-driven player's deferred work as tasks on a Tokio runtime.
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-rt")))]
impl Scheduler for tokio::runtime::Handle {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
