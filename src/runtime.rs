use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// Terminal input as the app sees it. `Tick` stands in for "nothing
/// arrived within the tick interval".
#[derive(Clone, Debug)]
pub enum StudyEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

impl StudyEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(key) => Some(StudyEvent::Key(key)),
            CtEvent::Mouse(mouse) => Some(StudyEvent::Mouse(mouse)),
            CtEvent::Resize(_, _) => Some(StudyEvent::Resize),
            _ => None,
        }
    }
}

pub trait StudyEventSource: Send + 'static {
    /// Waits up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<StudyEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread and forwards them over a
/// channel; the thread ends when the receiver is dropped.
pub struct CrosstermEventSource {
    rx: Receiver<StudyEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event reader stopped");
                    break;
                }
            };
            if let Some(ev) = StudyEvent::from_crossterm(ev) {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<StudyEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker(pub Duration);

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.0
    }
}

/// Channel-fed source for tests
pub struct TestEventSource {
    rx: Receiver<StudyEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<StudyEvent>) -> Self {
        Self { rx }
    }
}

impl StudyEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<StudyEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// One loop iteration: the event and the wall time since the previous step
#[derive(Debug)]
pub struct Step {
    pub event: StudyEvent,
    pub elapsed: Duration,
}

/// Pulls events one at a time, turning quiet intervals into ticks and
/// measuring the time page timers must be advanced by.
pub struct Runner<E: StudyEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last: Instant,
}

impl<E: StudyEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last: Instant::now(),
        }
    }

    pub fn step(&mut self) -> Step {
        let event = match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => StudyEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                // keep timers moving at the tick rate even without input
                std::thread::sleep(self.ticker.interval());
                StudyEvent::Tick
            }
        };
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        Step { event, elapsed }
    }
}
