//! Event producers and the merged event stream.
//!
//! Three independent sources each run on their own thread and publish on
//! their own channel: the ticker, the terminal reader and the shutdown
//! signal. [`EventStreams`] waits on all three and yields one event at a time.

use std::thread;

use crossbeam_channel::{Receiver, select, unbounded};
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use tracing::{info, warn};

use super::input::map_key;

/// Discrete inputs to the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Poll timer fired.
    Tick,
    DecreaseInterval,
    IncreaseInterval,
    Help,
    Quit,
    ToggleRelative,
    ResetStatistics,
    ViewNext,
    ViewPrev,
    /// Any other key.
    OtherKey,
    /// Terminal resized to (width, height).
    Resize(u16, u16),
    /// Terminal input failed.
    Error(String),
}

/// Reads terminal input on a thread, mapped to [`Event`]s.
pub fn spawn_terminal_reader() -> Receiver<Event> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        loop {
            let event = match event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => map_key(key),
                Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                Ok(_) => continue,
                Err(e) => {
                    let _ = tx.send(Event::Error(e.to_string()));
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
    rx
}

/// Installs the SIGINT/SIGTERM handler; each signal sends one message.
pub fn shutdown_signal() -> Result<Receiver<()>, ctrlc::Error> {
    let (tx, rx) = unbounded();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })?;
    Ok(rx)
}

/// The three event channels merged into one blocking stream.
pub struct EventStreams {
    ticks: Receiver<()>,
    terminal: Receiver<Event>,
    shutdown: Receiver<()>,
}

impl EventStreams {
    pub fn new(ticks: Receiver<()>, terminal: Receiver<Event>, shutdown: Receiver<()>) -> Self {
        Self {
            ticks,
            terminal,
            shutdown,
        }
    }

    /// Blocks until any source has an event.
    pub fn next_event(&self) -> Event {
        select! {
            recv(self.shutdown) -> msg => match msg {
                Ok(()) => {
                    info!("shutdown signal received");
                    Event::Quit
                }
                Err(_) => Event::Error("shutdown channel closed".to_string()),
            },
            recv(self.terminal) -> msg => msg.unwrap_or_else(|_| {
                warn!("terminal reader stopped");
                Event::Error("terminal reader stopped".to_string())
            }),
            recv(self.ticks) -> msg => match msg {
                Ok(()) => Event::Tick,
                Err(_) => Event::Error("ticker stopped".to_string()),
            },
        }
    }
}

impl Iterator for EventStreams {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        Some(self.next_event())
    }
}
