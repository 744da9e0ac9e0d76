use std::{future::Future, time::Duration};

use tokio::time::{sleep_until, Instant};

/// Decides how long to wait before each request of a sequential batch.
pub trait Pacer {
    fn pause(&mut self) -> impl Future<Output = ()> + Send;
}

/// Keeps at least `delay` between the starts of two consecutive requests.
/// The first request goes out immediately.
#[derive(Debug)]
pub struct FixedDelay {
    delay: Duration,
    last: Option<Instant>,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }
}

impl Pacer for FixedDelay {
    async fn pause(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.delay).await;
        }
        self.last = Some(Instant::now());
    }
}

/// No waiting at all.  For local files and tests.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&mut self) {}
}
