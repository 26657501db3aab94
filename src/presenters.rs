use std::time::Duration;

use crate::timer::Countdown;

/// Terminal cell coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        let clamp = |v: u16, d: i32| (v as i32 + d).clamp(0, u16::MAX as i32) as u16;
        Self {
            x: clamp(self.x, dx),
            y: clamp(self.y, dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    NotStarted,
    Running,
    Finished,
}

/// Button placement task: a countdown during which pointer movement is
/// tracked, then the last position is frozen.
#[derive(Debug, Clone)]
pub struct PlacementTask {
    countdown: Countdown,
    tracked: Position,
    frozen: Option<Position>,
}

impl PlacementTask {
    pub fn new(seconds: u32) -> Self {
        Self {
            countdown: Countdown::new(seconds, Duration::from_secs(1)),
            tracked: Position::default(),
            frozen: None,
        }
    }

    pub fn phase(&self) -> PlacementPhase {
        if self.frozen.is_some() {
            PlacementPhase::Finished
        } else if self.countdown.is_running() {
            PlacementPhase::Running
        } else {
            PlacementPhase::NotStarted
        }
    }

    pub fn start(&mut self) {
        if self.phase() == PlacementPhase::NotStarted {
            self.countdown.start();
            tracing::debug!("placement countdown started");
        }
    }

    pub fn on_pointer_move(&mut self, pos: Position) {
        if self.phase() == PlacementPhase::Running {
            self.tracked = pos;
        }
    }

    pub fn nudge(&mut self, dx: i32, dy: i32) {
        if self.phase() == PlacementPhase::Running {
            self.tracked = self.tracked.offset(dx, dy);
        }
    }

    /// Returns true once, on the step that finishes the task.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.countdown.advance(dt) {
            self.frozen = Some(self.tracked);
            tracing::debug!(x = self.tracked.x, y = self.tracked.y, "placement frozen");
            true
        } else {
            false
        }
    }

    pub fn seconds_left(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn tracked(&self) -> Position {
        self.tracked
    }

    pub fn frozen(&self) -> Option<Position> {
        self.frozen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEvent {
    Advanced(usize),
    Finished,
}

/// Fixed sequence of slides, each shown for one period; one extra period
/// after the last slide ends the show.
#[derive(Debug, Clone)]
pub struct Slideshow {
    len: usize,
    current: usize,
    timer: Countdown,
    finished: bool,
}

impl Slideshow {
    pub fn new(len: usize, period: Duration) -> Self {
        let mut timer = Countdown::new(1, period);
        timer.start();
        Self {
            len,
            current: 0,
            timer,
            finished: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feeds elapsed time and reports the last thing that happened.
    pub fn advance(&mut self, dt: Duration) -> Option<SlideEvent> {
        if self.finished {
            return None;
        }
        let mut event = None;
        let mut dt = dt;
        while self.timer.advance(dt) {
            dt = self.timer.take_overflow();
            if self.current + 1 < self.len {
                self.current += 1;
                self.timer.start();
                event = Some(SlideEvent::Advanced(self.current));
            } else {
                self.finished = true;
                return Some(SlideEvent::Finished);
            }
        }
        event
    }
}
