//! Terminal dashboard: control loop, event sources and rendering.

mod app;
mod event;
mod input;
mod render;
mod scheduler;
mod state;
mod style;
mod widgets;

pub use app::{App, AppError};
pub use event::{Event, EventStreams, shutdown_signal, spawn_terminal_reader};
pub use render::{Renderer, Screen, TerminalRenderer};
pub use scheduler::{MIN_INTERVAL, PollScheduler};
pub use state::{AppState, Mode};
