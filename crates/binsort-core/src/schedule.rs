//! Cancellable periodic timers driven by elapsed time.
//!
//! Timers never read a clock themselves. The owner feeds them elapsed time
//! through [`PeriodicTimer::advance`] and acts on the returned fire count,
//! which keeps every session step deterministic under test.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Cancelled,
}

/// A repeating timer.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    period: Duration,
    accumulated: Duration,
    state: TimerState,
}

impl PeriodicTimer {
    /// Creates an idle timer. `period` must be non-zero.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
            state: TimerState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// (Re)starts the timer from a fresh period.
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.state = TimerState::Running;
    }

    /// Stops the timer. Later calls to [`advance`](Self::advance) fire nothing.
    pub fn cancel(&mut self) {
        self.accumulated = Duration::ZERO;
        self.state = TimerState::Cancelled;
    }

    /// Adds elapsed time and returns how many periods completed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() || self.period.is_zero() {
            return 0;
        }
        self.accumulated += elapsed;
        let fires = self.accumulated.as_nanos() / self.period.as_nanos();
        let fires = u32::try_from(fires).unwrap_or(u32::MAX);
        self.accumulated -= self.period * fires;
        fires
    }
}

/// The two timers a session runs: the round countdown and item spawning.
#[derive(Debug, Clone)]
pub struct SessionTimers {
    pub countdown: PeriodicTimer,
    pub spawn: PeriodicTimer,
}

impl SessionTimers {
    pub fn new(countdown_period: Duration, spawn_period: Duration) -> Self {
        Self {
            countdown: PeriodicTimer::new(countdown_period),
            spawn: PeriodicTimer::new(spawn_period),
        }
    }

    pub fn start_all(&mut self) {
        self.countdown.start();
        self.spawn.start();
    }

    /// Cancels both timers together.
    pub fn cancel_all(&mut self) {
        self.countdown.cancel();
        self.spawn.cancel();
    }
}
