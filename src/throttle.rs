use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Minimum gap between the end of one metadata query and the start of the next.
pub const MIN_QUERY_SPACING: Duration = Duration::from_millis(300);

/// Each job starts no sooner than `spacing` after the previous one finished.
#[derive(Debug)]
pub struct Throttle {
    spacing: Duration,
    last_finished: Option<Instant>,
}

impl Throttle {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_finished: None,
        }
    }

    pub fn remaining(&self) -> Duration {
        match self.last_finished {
            Some(at) => self.spacing.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    pub async fn run<F, T>(&mut self, job: F) -> T
    where
        F: Future<Output = T>,
    {
        let wait = self.remaining();
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Throttling metadata query");
            tokio::time::sleep(wait).await;
        }
        let out = job.await;
        self.last_finished = Some(Instant::now());
        out
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(MIN_QUERY_SPACING)
    }
}
