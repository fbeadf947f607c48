//! Per-connection rate limiting.
//!
//! A fixed-period gate: with a rate of N messages/second, `next()` resolves
//! once every `1s / N`. There is no burst allowance. A slow reader does not
//! bank ticks for later, because missed ticks are delayed rather than
//! replayed.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::config::MAX_THROTTLE;

pub struct Throttler {
    interval: Option<Interval>,
    stopped: bool,
}

impl Throttler {
    /// Create a throttler for `rate` messages/second (0 = unlimited).
    ///
    /// Rates above `MAX_THROTTLE` are capped to it.
    pub fn new(rate: u32) -> Self {
        let interval = (rate > 0).then(|| {
            let period = Duration::from_secs(1) / rate.min(MAX_THROTTLE);
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        Self {
            interval,
            stopped: false,
        }
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.interval.is_some() && !self.stopped
    }

    /// Wait until the next message may be handled.
    ///
    /// Returns `true` after waiting for a tick, `false` immediately when no
    /// rate limit is in place or the throttler was stopped.
    pub async fn next(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                true
            }
            None => false,
        }
    }

    /// Stop generating ticks; later `next()` calls return `false`.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.interval = None;
    }
}
