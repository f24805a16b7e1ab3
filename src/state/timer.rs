/// Countdown timer state machine
///
/// The timer keeps an absolute deadline on a monotonic time axis instead of
/// decrementing a counter per tick. Every caller passes the current
/// monotonic time (`now`) in, which keeps the state machine pure and lets
/// the engine decide where time comes from.
use std::time::Duration;

use serde::Serialize;

/// Default window before expiry in which the near-end cue fires
pub const DEFAULT_NEAR_END_WINDOW: Duration = Duration::from_millis(4000);

/// Observable state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerState {
    /// Not started, or stopped by a reset/absolute win
    Idle,

    /// Counting down against a live deadline
    Running,

    /// Started but suspended with the remaining time stored
    Paused,

    /// Reached zero through the countdown
    Expired,

    /// An absolute win is declared; timer commands are ignored
    AbsoluteWinLock,
}

impl TimerState {
    pub fn description(&self) -> &'static str {
        match self {
            TimerState::Idle => "Idle",
            TimerState::Running => "Running",
            TimerState::Paused => "Paused",
            TimerState::Expired => "Expired",
            TimerState::AbsoluteWinLock => "Locked (absolute win)",
        }
    }
}

/// The `(running, paused)` pair published to presentation surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunState {
    pub running: bool,
    pub paused: bool,
}

/// Discrete alerts for the cue dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CueKind {
    /// Remaining time first dropped into the near-end window
    NearEnd,
    /// Remaining time reached zero
    Expired,
}

/// What a single tick changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub cues: Vec<CueKind>,
    pub time_changed: bool,
    pub run_state_changed: bool,
}

impl TickOutcome {
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty() && !self.time_changed && !self.run_state_changed
    }
}

#[derive(Debug, Clone)]
pub struct CountdownTimer {
    seconds_remaining: u64,
    running: bool,
    paused: bool,
    /// Monotonic time at which the countdown hits zero; only set while running unpaused
    deadline: Option<Duration>,
    /// Remaining duration captured by the last pause
    paused_remaining: Duration,
    near_end_window: Duration,
    fired_near_end: bool,
    fired_expired: bool,
}

impl CountdownTimer {
    pub fn new(near_end_window: Duration) -> Self {
        Self {
            seconds_remaining: 0,
            running: false,
            paused: false,
            deadline: None,
            paused_remaining: Duration::ZERO,
            near_end_window,
            fired_near_end: false,
            fired_expired: false,
        }
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn run_state(&self) -> RunState {
        RunState {
            running: self.running,
            paused: self.paused,
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn state(&self) -> TimerState {
        match (self.running, self.paused) {
            (true, true) => TimerState::Paused,
            (true, false) => TimerState::Running,
            _ if self.fired_expired && self.seconds_remaining == 0 => TimerState::Expired,
            _ => TimerState::Idle,
        }
    }

    /// Preset the countdown and stop it; valid from any state
    pub fn set_seconds(&mut self, seconds: u64) {
        self.seconds_remaining = seconds;
        self.running = false;
        self.paused = false;
        self.deadline = None;
        self.paused_remaining = Duration::ZERO;
        self.fired_near_end = false;
        self.fired_expired = false;
    }

    /// Start counting down from the current preset; false if nothing to count
    pub fn start(&mut self, now: Duration) -> bool {
        if self.seconds_remaining == 0 {
            return false;
        }

        self.deadline = Some(now + Duration::from_secs(self.seconds_remaining));
        self.running = true;
        self.paused = false;
        self.paused_remaining = Duration::ZERO;
        self.fired_near_end = false;
        self.fired_expired = false;
        true
    }

    pub fn pause(&mut self, now: Duration) -> bool {
        if !self.running || self.paused {
            return false;
        }

        let remaining = self.remaining_at(now);
        self.paused_remaining = remaining;
        self.seconds_remaining = remaining.as_secs();
        self.deadline = None;
        self.paused = true;
        true
    }

    pub fn resume(&mut self, now: Duration) -> bool {
        if !self.running || !self.paused {
            return false;
        }

        self.deadline = Some(now + self.paused_remaining);
        self.paused = false;
        true
    }

    pub fn toggle(&mut self, now: Duration) -> bool {
        if !self.running {
            return false;
        }
        if self.paused {
            self.resume(now)
        } else {
            self.pause(now)
        }
    }

    /// Stop exactly where the countdown stands, without keeping pause bookkeeping
    pub fn freeze(&mut self, now: Duration) -> bool {
        if !self.running {
            return false;
        }

        if !self.paused {
            self.seconds_remaining = self.remaining_at(now).as_secs();
        }
        self.running = false;
        self.paused = false;
        self.deadline = None;
        self.paused_remaining = Duration::ZERO;
        true
    }

    /// Recompute the remaining time from the deadline and fire due cues
    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let Some(deadline) = self.deadline.filter(|_| self.running && !self.paused) else {
            return outcome;
        };

        let remaining = deadline.saturating_sub(now);

        if !remaining.is_zero() && remaining <= self.near_end_window && !self.fired_near_end {
            self.fired_near_end = true;
            outcome.cues.push(CueKind::NearEnd);
        }

        let seconds = remaining.as_secs();
        if seconds != self.seconds_remaining {
            self.seconds_remaining = seconds;
            outcome.time_changed = true;
        }

        if remaining.is_zero() {
            if !self.fired_expired {
                self.fired_expired = true;
                outcome.cues.push(CueKind::Expired);
            }
            self.running = false;
            self.paused = false;
            self.seconds_remaining = 0;
            self.deadline = None;
            outcome.time_changed = true;
            outcome.run_state_changed = true;
        }

        outcome
    }

    fn remaining_at(&self, now: Duration) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_sub(now))
            .unwrap_or_else(|| Duration::from_secs(self.seconds_remaining))
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_END_WINDOW)
    }
}
