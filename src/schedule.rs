//! Cancellable one-shot timers driven from the egui frame loop

use std::time::{Duration, Instant};

/// Whether the window may still be touched by scheduled callbacks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Disposed,
}

/// A pending wake-up. Owning the `Timer` is owning the right to cancel it.
///
/// Firing disarms the timer; the owner re-arms after finishing its work, so the
/// next wake-up is measured from completion and drift is not corrected.
#[derive(Clone, Debug)]
pub struct Timer {
    interval: Duration,
    due: Option<Instant>,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, due: None }
    }

    /// Fire on the next poll
    pub fn arm_now(&mut self, now: Instant) {
        self.due = Some(now);
    }

    /// Fire one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Returns true (and disarms) when the wake-up is due
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the wake-up, zero if overdue, `None` if disarmed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}

/// Nearest pending wake-up among several timers
pub fn next_wakeup<'a>(timers: impl IntoIterator<Item = &'a Timer>, now: Instant) -> Option<Duration> {
    timers.into_iter().filter_map(|t| t.remaining(now)).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn fires_once_then_stays_quiet_until_rearmed() {
        let t0 = Instant::now();
        let mut timer = Timer::new(SEC);
        assert!(!timer.fire(t0));
        timer.arm(t0);
        assert!(!timer.fire(t0 + Duration::from_millis(999)));
        assert!(timer.fire(t0 + SEC));
        assert!(!timer.is_armed());
        assert!(!timer.fire(t0 + SEC * 5));
    }

    #[test]
    fn cancel_drops_pending_wakeup() {
        let t0 = Instant::now();
        let mut timer = Timer::new(SEC);
        timer.arm_now(t0);
        timer.cancel();
        assert!(!timer.fire(t0 + SEC));
        assert_eq!(timer.remaining(t0), None);
    }

    #[test]
    fn rearming_is_relative_to_completion() {
        let t0 = Instant::now();
        let mut timer = Timer::new(SEC);
        timer.arm(t0);
        let late = t0 + Duration::from_millis(1300);
        assert!(timer.fire(late));
        timer.arm(late);
        assert_eq!(timer.remaining(late), Some(SEC));
        assert!(!timer.fire(t0 + SEC * 2));
    }

    #[test]
    fn next_wakeup_picks_nearest_armed_timer() {
        let t0 = Instant::now();
        let mut a = Timer::new(SEC);
        let mut b = Timer::new(Duration::from_secs(60));
        let c = Timer::new(Duration::from_millis(10));
        a.arm(t0);
        b.arm(t0);
        assert_eq!(next_wakeup([&a, &b, &c], t0), Some(SEC));
        a.cancel();
        assert_eq!(next_wakeup([&a, &b, &c], t0), Some(Duration::from_secs(60)));
        b.cancel();
        assert_eq!(next_wakeup([&a, &b, &c], t0), None);
    }
}
