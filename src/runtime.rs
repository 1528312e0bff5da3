//! Terminal events plus the wall clock, merged into one stream for the app.
//!
//! The [`Runner`] reports time as [`AppEvent::Tick`] carrying the real time
//! that passed since the previous tick. Before handing out a key or resize it
//! first flushes the time that elapsed up to it, so the exercise always sees
//! time and input in the order they happened.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::debug;

/// Longest wait for input before the runner reports elapsed time anyway
pub const TICK_RATE_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Wall-clock time since the previous tick
    Tick(Duration),
}

/// Source of terminal input
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for input.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // release and repeat reports would double every press on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    debug!(error = %err, "terminal input closed");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
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

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Events pushed by hand, for driving the app without a terminal
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How long the runner waits for input between ticks
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Where the runner reads the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Turns input plus the passing of time into a single ordered event stream
pub struct Runner<E: AppEventSource, T: Ticker, C: Clock = SystemClock> {
    event_source: E,
    ticker: T,
    clock: C,
    last_tick: Instant,
    pending: Option<AppEvent>,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self::with_clock(event_source, ticker, SystemClock)
    }
}

impl<E: AppEventSource, T: Ticker, C: Clock> Runner<E, T, C> {
    pub fn with_clock(event_source: E, ticker: T, clock: C) -> Self {
        let last_tick = clock.now();
        Self {
            event_source,
            ticker,
            clock,
            last_tick,
            pending: None,
        }
    }

    /// Next event. Waits up to one ticker interval for input; either way the
    /// time elapsed so far is reported as a tick first, and any input follows
    /// on the next call.
    pub fn step(&mut self) -> AppEvent {
        if let Some(event) = self.pending.take() {
            return event;
        }

        let received = self.event_source.recv_timeout(self.ticker.interval());
        let tick = AppEvent::Tick(self.take_elapsed());
        match received {
            // a stray tick from the source would double count time
            Ok(AppEvent::Tick(_)) => {}
            Ok(event) => self.pending = Some(event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // nothing will ever arrive; keep the tick rate instead of spinning
                std::thread::sleep(self.ticker.interval());
            }
        }
        tick
    }

    fn take_elapsed(&mut self) -> Duration {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        elapsed
    }
}
