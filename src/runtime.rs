use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum PomoEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The input side went away; the loop should exit.
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError>;

    /// Block indefinitely for an event. Used while the countdown is not
    /// running and no ticks are wanted.
    fn recv(&self) -> Result<PomoEvent, mpsc::RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<PomoEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(PomoEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(PomoEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
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

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<PomoEvent, mpsc::RecvError> {
        self.rx.recv()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<PomoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PomoEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<PomoEvent, mpsc::RecvError> {
        self.rx.recv()
    }
}

/// Runner that advances the application one event at a time. Tick synthesis
/// is gated by the caller: while the countdown runs, an expired tick interval
/// yields `Tick`; otherwise the runner blocks on real input and no ticks are
/// produced.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn step(&self, ticking: bool) -> PomoEvent {
        if ticking {
            match self.event_source.recv_timeout(self.ticker.interval()) {
                Ok(ev) => ev,
                Err(RecvTimeoutError::Timeout) => PomoEvent::Tick,
                Err(RecvTimeoutError::Disconnected) => PomoEvent::Closed,
            }
        } else {
            match self.event_source.recv() {
                Ok(ev) => ev,
                Err(_) => PomoEvent::Closed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout_while_ticking() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(true), PomoEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(PomoEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(true), PomoEvent::Resize);
    }

    #[test]
    fn gated_step_never_synthesizes_ticks() {
        let (tx, rx) = mpsc::channel();
        tx.send(PomoEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // A queued event comes straight through without a tick in front.
        assert_matches!(runner.step(false), PomoEvent::Resize);

        // Once the sender is gone the gated step reports closure rather
        // than ticking.
        drop(tx);
        assert_matches!(runner.step(false), PomoEvent::Closed);
    }

    #[test]
    fn disconnected_source_closes_while_ticking() {
        let (tx, rx) = mpsc::channel::<PomoEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(true), PomoEvent::Closed);
    }
}
