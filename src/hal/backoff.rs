//! Back-off strategies for the blocking waits.
//!
//! A full TX ring and a running one-shot transfer are waited out in a loop.
//! The loop calls [`Backoff::pause`] between polls so a hosted build can
//! sleep or yield to a scheduler instead of spinning.

use embedded_hal::delay::DelayNs;

use crate::internal::constants::DEFAULT_BACKOFF_US;

/// One pause between two polls of a blocking wait.
pub trait Backoff {
    /// Wait a little before the next poll
    fn pause(&mut self);
}

impl<B: Backoff + ?Sized> Backoff for &mut B {
    #[inline]
    fn pause(&mut self) {
        (**self).pause();
    }
}

/// Busy-spin with a CPU relax hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin;

impl Backoff for Spin {
    #[inline]
    fn pause(&mut self) {
        core::hint::spin_loop();
    }
}

/// Sleep a fixed period through an `embedded-hal` delay.
#[derive(Debug)]
pub struct DelayBackoff<D: DelayNs> {
    delay: D,
    period_us: u32,
}

impl<D: DelayNs> DelayBackoff<D> {
    /// Pause for the default period on every poll
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            period_us: DEFAULT_BACKOFF_US,
        }
    }

    /// Set the pause period in microseconds
    #[must_use]
    pub fn with_period_us(mut self, period_us: u32) -> Self {
        self.period_us = period_us;
        self
    }

    /// Give the delay provider back
    pub fn into_inner(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Backoff for DelayBackoff<D> {
    #[inline]
    fn pause(&mut self) {
        self.delay.delay_us(self.period_us);
    }
}

/// Call a yield hook (scheduler yield, `wfe`, watchdog feed) on every poll.
#[derive(Debug, Clone, Copy)]
pub struct Yield<F: FnMut()>(pub F);

impl<F: FnMut()> Backoff for Yield<F> {
    #[inline]
    fn pause(&mut self) {
        (self.0)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDelay;

    #[test]
    fn delay_backoff_sleeps_default_period() {
        let mut backoff = DelayBackoff::new(MockDelay::new());
        backoff.pause();
        backoff.pause();
        assert_eq!(backoff.into_inner().total_ns(), 2 * 10_000);
    }

    #[test]
    fn delay_backoff_custom_period() {
        let mut backoff = DelayBackoff::new(MockDelay::new()).with_period_us(250);
        backoff.pause();
        assert_eq!(backoff.into_inner().total_ns(), 250_000);
    }

    #[test]
    fn yield_calls_hook() {
        let mut calls = 0;
        {
            let mut backoff = Yield(|| calls += 1);
            backoff.pause();
            backoff.pause();
            backoff.pause();
        }
        assert_eq!(calls, 3);
    }

    #[test]
    fn mut_ref_forwards() {
        fn pause_twice(mut b: impl Backoff) {
            b.pause();
            b.pause();
        }

        let mut inner = DelayBackoff::new(MockDelay::new()).with_period_us(1);
        pause_twice(&mut inner);
        assert_eq!(inner.into_inner().total_ns(), 2_000);
    }
}
