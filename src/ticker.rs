use std::time::{Duration, Instant};

/// Pomodoro countdown resolution in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Converts wall-clock time into whole ticks, carrying the remainder so a
/// late wake-up does not lose or gain seconds.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    last: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: Instant::now(),
        }
    }

    /// Whole ticks elapsed since the previous call
    pub fn due(&mut self) -> u32 {
        self.due_at(Instant::now())
    }

    fn due_at(&mut self, now: Instant) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        let elapsed = now.saturating_duration_since(self.last);
        let ticks = u32::try_from(elapsed.as_nanos() / self.period.as_nanos()).unwrap_or(u32::MAX);
        self.last = self
            .period
            .checked_mul(ticks)
            .and_then(|step| self.last.checked_add(step))
            .unwrap_or(now);
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_due_carries_remainder() {
        let mut ticker = Ticker::new(Duration::from_millis(1000));
        let start = ticker.last;

        assert_eq!(ticker.due_at(start + Duration::from_millis(2500)), 2);
        // the half second left over counts toward the next tick
        assert_eq!(ticker.due_at(start + Duration::from_millis(3000)), 1);
        assert_eq!(ticker.due_at(start + Duration::from_millis(3900)), 0);
    }

    #[test]
    fn test_due_saturates_after_long_stall() {
        let mut ticker = Ticker::new(Duration::from_nanos(1));
        let start = ticker.last;
        let stalled = start + Duration::from_secs(10);

        assert_eq!(ticker.due_at(stalled), u32::MAX);
        assert!(ticker.last <= stalled);
        // the rest of the backlog is still owed
        assert_eq!(ticker.due_at(stalled), u32::MAX);
    }

    #[test]
    fn test_sub_millisecond_period() {
        let mut ticker = Ticker::new(Duration::from_micros(250));
        let start = ticker.last;
        assert_eq!(ticker.due_at(start + Duration::from_millis(1)), 4);
    }
}
