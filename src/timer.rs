use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { remaining: u32 },
    Expired,
}

/// Counts down a fixed number of periods and fires once when it hits zero.
///
/// Time is fed in explicitly through [`Countdown::advance`]; the owner
/// decides how wall time maps onto periods. Dropping the countdown is the
/// cancellation, there is no detached callback.
#[derive(Debug, Clone)]
pub struct Countdown {
    ticks: u32,
    period: Duration,
    elapsed: Duration,
    state: TimerState,
}

impl Countdown {
    pub fn new(ticks: u32, period: Duration) -> Self {
        Self {
            ticks,
            period,
            elapsed: Duration::ZERO,
            state: TimerState::Idle,
        }
    }

    /// Starts (or restarts) from the full tick count.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.state = TimerState::Running {
            remaining: self.ticks,
        };
    }

    pub fn cancel(&mut self) {
        self.elapsed = Duration::ZERO;
        self.state = TimerState::Idle;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            TimerState::Running { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Consumes one period. Returns true on the tick that expires the timer.
    pub fn tick(&mut self) -> bool {
        match self.state {
            TimerState::Running { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.state = TimerState::Expired;
                    true
                } else {
                    self.state = TimerState::Running { remaining };
                    false
                }
            }
            TimerState::Idle | TimerState::Expired => false,
        }
    }

    /// Feeds elapsed time. Returns true exactly once, when the countdown
    /// expires; time past the expiry is kept for [`Countdown::take_overflow`].
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.is_running() {
            return false;
        }
        if self.remaining() == Some(0) {
            self.state = TimerState::Expired;
            self.elapsed += dt;
            return true;
        }

        self.elapsed += dt;
        while self.elapsed >= self.period && self.is_running() {
            self.elapsed -= self.period;
            if self.tick() {
                return true;
            }
        }
        false
    }

    /// Time accumulated beyond the expiring tick.
    pub fn take_overflow(&mut self) -> Duration {
        if self.is_expired() {
            std::mem::take(&mut self.elapsed)
        } else {
            Duration::ZERO
        }
    }
}

/// Input lockout: once engaged, stays active for a fixed window.
#[derive(Debug, Clone)]
pub struct Lockout {
    window: Duration,
    remaining: Duration,
}

impl Lockout {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            remaining: Duration::ZERO,
        }
    }

    pub fn engage(&mut self) {
        self.remaining = self.window;
    }

    pub fn is_active(&self) -> bool {
        !self.remaining.is_zero()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }
}
