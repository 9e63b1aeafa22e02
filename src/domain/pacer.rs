//! Fixed inter-request delay.
//!
//! One pacer lives for a whole fetch run so the delay also applies between
//! the last request for one player and the first request for the next.

use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Blocks until `delay` has passed since the previous call. The first
    /// call returns immediately.
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                thread::sleep(self.delay - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}
