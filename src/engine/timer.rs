use std::time::{Duration, Instant};

/// One second between countdown fires.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Default idle threshold before a test is ended for inactivity.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerFire {
    CountdownTick,
    InactivityExpired,
}

/// Periodic timer that fires every `period` while armed.
#[derive(Clone, Debug)]
pub struct Countdown {
    period: Duration,
    next_fire: Option<Instant>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
        }
    }

    /// Arm the timer so the first fire lands one period after `now`.
    /// Restarting an armed countdown discards its pending fire. A deadline
    /// past the end of `Instant` leaves the timer disarmed.
    pub fn start(&mut self, now: Instant) {
        self.next_fire = now.checked_add(self.period);
    }

    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire.is_some()
    }

    pub fn next_fire(&self) -> Option<Instant> {
        self.next_fire
    }

    /// Consume one due fire, rescheduling the next one a period later.
    fn take_due(&mut self, now: Instant) -> Option<Instant> {
        let at = self.next_fire.filter(|&at| at <= now)?;
        self.next_fire = at.checked_add(self.period);
        Some(at)
    }
}

/// One-shot timer pushed back on every rearm.
#[derive(Clone, Debug)]
pub struct InactivityTimer {
    threshold: Duration,
    deadline: Option<Instant>,
}

impl InactivityTimer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            deadline: None,
        }
    }

    /// Push the deadline to `threshold` after `now`. An unrepresentable
    /// deadline never fires.
    pub fn rearm(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.threshold);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn take_due(&mut self, now: Instant) -> Option<Instant> {
        let at = self.deadline.filter(|&at| at <= now)?;
        self.deadline = None;
        Some(at)
    }
}

/// The two timers of a running test.
#[derive(Clone, Debug)]
pub struct TestTimers {
    pub countdown: Countdown,
    pub inactivity: InactivityTimer,
}

impl TestTimers {
    pub fn new(inactivity_timeout: Duration) -> Self {
        Self {
            countdown: Countdown::new(COUNTDOWN_PERIOD),
            inactivity: InactivityTimer::new(inactivity_timeout),
        }
    }

    pub fn cancel_all(&mut self) {
        self.countdown.cancel();
        self.inactivity.cancel();
    }

    pub fn any_armed(&self) -> bool {
        self.countdown.is_armed() || self.inactivity.is_armed()
    }

    /// Pop the earliest fire scheduled at or before `now`.
    ///
    /// Call repeatedly until `None` to catch up on every fire that elapsed
    /// since the last poll. On a tie the countdown fires first.
    pub fn next_due(&mut self, now: Instant) -> Option<(Instant, TimerFire)> {
        let countdown = self.countdown.next_fire.filter(|&at| at <= now);
        let inactivity = self.inactivity.deadline.filter(|&at| at <= now);
        match (countdown, inactivity) {
            (Some(c), Some(i)) if i < c => self
                .inactivity
                .take_due(now)
                .map(|at| (at, TimerFire::InactivityExpired)),
            (Some(_), _) => self
                .countdown
                .take_due(now)
                .map(|at| (at, TimerFire::CountdownTick)),
            (None, Some(_)) => self
                .inactivity
                .take_due(now)
                .map(|at| (at, TimerFire::InactivityExpired)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut TestTimers, now: Instant) -> Vec<TimerFire> {
        std::iter::from_fn(|| timers.next_due(now).map(|(_, f)| f)).collect()
    }

    #[test]
    fn countdown_fires_once_per_period() {
        let t0 = Instant::now();
        let mut timers = TestTimers::new(Duration::from_secs(30));
        timers.countdown.start(t0);

        assert!(drain(&mut timers, t0 + Duration::from_millis(999)).is_empty());
        assert_eq!(
            drain(&mut timers, t0 + Duration::from_millis(1000)),
            vec![TimerFire::CountdownTick]
        );
        assert_eq!(
            timers.countdown.next_fire(),
            Some(t0 + Duration::from_secs(2))
        );
    }

    #[test]
    fn countdown_catches_up_after_late_poll() {
        let t0 = Instant::now();
        let mut timers = TestTimers::new(Duration::from_secs(30));
        timers.countdown.start(t0);

        let fires = drain(&mut timers, t0 + Duration::from_millis(3500));
        assert_eq!(fires.len(), 3);
    }

    #[test]
    fn inactivity_rearm_pushes_deadline() {
        let t0 = Instant::now();
        let mut timers = TestTimers::new(Duration::from_secs(3));
        timers.inactivity.rearm(t0);
        timers.inactivity.rearm(t0 + Duration::from_secs(2));

        assert!(drain(&mut timers, t0 + Duration::from_secs(4)).is_empty());
        assert_eq!(
            drain(&mut timers, t0 + Duration::from_secs(5)),
            vec![TimerFire::InactivityExpired]
        );
        assert!(!timers.inactivity.is_armed());
    }

    #[test]
    fn fires_come_out_in_deadline_order() {
        let t0 = Instant::now();
        let mut timers = TestTimers::new(Duration::from_millis(2500));
        timers.countdown.start(t0);
        timers.inactivity.rearm(t0);

        let fires = drain(&mut timers, t0 + Duration::from_secs(3));
        assert_eq!(
            fires,
            vec![
                TimerFire::CountdownTick,
                TimerFire::CountdownTick,
                TimerFire::InactivityExpired,
                TimerFire::CountdownTick,
            ]
        );
    }

    #[test]
    fn huge_threshold_never_fires() {
        let t0 = Instant::now();
        let mut timers = TestTimers::new(Duration::MAX);
        timers.inactivity.rearm(t0);

        assert!(!timers.inactivity.is_armed());
        assert!(drain(&mut timers, t0 + Duration::from_secs(3600)).is_empty());
    }

    #[test]
    fn cancel_all_disarms_both() {
        let t0 = Instant::now();
        let mut timers = TestTimers::new(Duration::from_secs(1));
        timers.countdown.start(t0);
        timers.inactivity.rearm(t0);
        timers.cancel_all();

        assert!(!timers.any_armed());
        assert!(drain(&mut timers, t0 + Duration::from_secs(10)).is_empty());
    }
}
