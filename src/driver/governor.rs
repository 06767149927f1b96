//! Fixed-rate dispatch pacing.

use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

/// Paces dispatch starts at a fixed target rate.
///
/// The interval separates successive dispatch *starts*; completion of the
/// dispatched work never feeds back into the cadence.
#[derive(Debug)]
pub struct RateGovernor {
    interval: Interval,
}

impl RateGovernor {
    /// Governor for `rate` dispatches per second. `rate` must be
    /// positive; configuration loading rejects anything else.
    pub fn new(rate: f64) -> Self {
        let period = Duration::from_secs_f64(1.0 / rate);
        let mut interval = time::interval(period);
        // A stalled loop resumes on the fixed grid instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// The fixed inter-dispatch interval.
    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next dispatch slot. The first slot is immediate.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn period_is_the_inverse_of_the_rate() {
        let governor = RateGovernor::new(10.0);
        assert_eq!(governor.period(), Duration::from_millis(100));
        let governor = RateGovernor::new(40.0);
        assert_eq!(governor.period(), Duration::from_millis(25));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_track_the_target_rate_over_ten_seconds() {
        let mut governor = RateGovernor::new(50.0);
        let start = Instant::now();
        let mut ticks: u32 = 0;
        loop {
            governor.tick().await;
            if start.elapsed() >= Duration::from_secs(10) {
                break;
            }
            ticks += 1;
        }
        // 50 rps over 10 s, within ±5%.
        let expected = 500.0;
        assert!(
            (f64::from(ticks) - expected).abs() <= expected * 0.05,
            "got {ticks} ticks in 10s"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_immediate() {
        let mut governor = RateGovernor::new(1.0);
        let start = Instant::now();
        governor.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
