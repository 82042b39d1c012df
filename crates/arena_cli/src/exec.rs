use std::time::Duration;

use arena::{LocalExecutor, LocalFuture};

/// Spawns onto the current `LocalSet`.
pub struct TokioExecutor;

impl LocalExecutor for TokioExecutor {
    fn spawn(&self, fut: LocalFuture) {
        tokio::task::spawn_local(fut);
    }

    fn sleep(&self, delay: Duration) -> LocalFuture {
        Box::pin(tokio::time::sleep(delay))
    }
}
