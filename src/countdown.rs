use std::time::Duration;

use crate::session::Phase;

/// Result of advancing the countdown by one whole second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// No countdown is live
    Inactive,
    /// Still running; `remaining` is the value now on display
    Running { phase: Phase, remaining: u32 },
    /// Reached zero on this tick. Reported exactly once per started countdown.
    Expired { phase: Phase },
}

/// The single per-second countdown slot.
///
/// Starting a countdown replaces whatever was running, so there is never more
/// than one live timer.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    phase: Option<Phase>,
    duration: u32,
    remaining: u32,
    // wall-clock time accumulated toward the next whole-second tick
    carry: Duration,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, duration_secs: u32, phase: Phase) {
        self.phase = Some(phase);
        self.duration = duration_secs;
        self.remaining = duration_secs;
        self.carry = Duration::ZERO;
    }

    /// Stop the running countdown without reporting expiry. No-op when stopped.
    pub fn cancel(&mut self) {
        self.phase = None;
        self.carry = Duration::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_some()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn remaining(&self) -> Option<u32> {
        self.phase.map(|_| self.remaining)
    }

    /// Duration the current countdown was started with
    pub fn duration(&self) -> Option<u32> {
        self.phase.map(|_| self.duration)
    }

    pub fn tick(&mut self) -> CountdownTick {
        let Some(phase) = self.phase else {
            return CountdownTick::Inactive;
        };

        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.phase = None;
            self.carry = Duration::ZERO;
            CountdownTick::Expired { phase }
        } else {
            CountdownTick::Running {
                phase,
                remaining: self.remaining,
            }
        }
    }

    /// Feed elapsed wall-clock time and return how many whole seconds are due.
    ///
    /// The caller ticks that many times (or until expiry). Time is only
    /// accumulated while a countdown is live.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        if !self.is_active() {
            return 0;
        }

        self.carry += elapsed;
        let whole = self.carry.as_secs();
        self.carry -= Duration::from_secs(whole);
        whole as u32
    }
}
