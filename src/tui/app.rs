//! Control loop.
//!
//! One event is handled per iteration. Collection happens inline on the loop
//! thread, so at most one query is ever in flight.

use std::fmt;
use std::io;

use chrono::Local;
use tracing::{error, info, warn};

use super::event::Event;
use super::render::{Renderer, Screen};
use super::scheduler::PollScheduler;
use super::state::{AppState, Mode};
use crate::collector::{CollectError, ServerInfo};
use crate::view::ViewRegistry;

/// Reason the control loop stopped abnormally.
#[derive(Debug)]
pub enum AppError {
    /// A fetch failed; the numbers on screen can no longer be trusted.
    Collect(CollectError),
    /// Drawing or terminal setup failed.
    Terminal(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Collect(e) => write!(f, "collection failed: {}", e),
            AppError::Terminal(e) => write!(f, "terminal error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Collect(e) => Some(e),
            AppError::Terminal(e) => Some(e),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Terminal(e)
    }
}

impl From<CollectError> for AppError {
    fn from(e: CollectError) -> Self {
        AppError::Collect(e)
    }
}

/// The dashboard: views, scheduler and renderer driven by events.
pub struct App<R: Renderer> {
    registry: ViewRegistry,
    server: Box<dyn ServerInfo>,
    scheduler: PollScheduler,
    renderer: R,
    state: AppState,
}

impl<R: Renderer> App<R> {
    pub fn new(
        mut registry: ViewRegistry,
        server: Box<dyn ServerInfo>,
        scheduler: PollScheduler,
        renderer: R,
        want_relative: bool,
    ) -> Self {
        let (width, height) = renderer.size().unwrap_or((80, 24));
        registry.set_want_relative_stats(want_relative);
        Self {
            registry,
            server,
            scheduler,
            renderer,
            state: AppState::new(want_relative, width, height),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Collects and draws the initial view, then handles `events` until quit,
    /// a fatal error, or the end of the stream.
    pub fn run(mut self, events: impl IntoIterator<Item = Event>) -> Result<(), AppError> {
        info!(
            "starting with view {}, interval {}s",
            self.registry.current().kind(),
            self.scheduler.interval()
        );
        self.collect()?;
        self.guarded(|app| app.render())?;

        for event in events {
            self.guarded(|app| app.handle_event(event))?;
            if self.state.is_finished() {
                return Ok(());
            }
        }
        self.finish()
    }

    /// Applies one event.
    pub fn handle_event(&mut self, event: Event) -> Result<(), AppError> {
        if self.state.is_finished() {
            return Ok(());
        }
        match event {
            Event::Quit => {
                info!("quit requested");
                self.finish()
            }
            Event::Error(msg) => {
                warn!("terminal input failed: {}", msg);
                self.finish()
            }
            Event::Resize(width, height) => {
                self.state.width = width;
                self.state.height = height;
                self.renderer.resize(width, height)?;
                self.redraw()
            }
            Event::Tick if self.state.mode == Mode::HelpShown => self.collect(),
            _ if self.state.mode == Mode::HelpShown => {
                self.state.mode = Mode::Running;
                self.render()
            }
            Event::Tick => {
                self.collect()?;
                self.render()
            }
            Event::ViewNext => {
                self.registry.next();
                self.collect()?;
                self.render()
            }
            Event::ViewPrev => {
                self.registry.previous();
                self.collect()?;
                self.render()
            }
            Event::ToggleRelative => {
                self.state.want_relative = !self.state.want_relative;
                self.registry.set_want_relative_stats(self.state.want_relative);
                self.render()
            }
            Event::ResetStatistics => {
                self.registry.current_mut().reset_statistics();
                self.render()
            }
            Event::Help => {
                self.state.mode = Mode::HelpShown;
                self.renderer.draw_help()?;
                Ok(())
            }
            Event::IncreaseInterval => {
                self.scheduler.increase();
                self.render()
            }
            Event::DecreaseInterval => {
                self.scheduler.decrease();
                self.render()
            }
            Event::OtherKey => self.render(),
        }
    }

    /// Runs `f`; on error the loop is finished and the terminal released.
    fn guarded(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), AppError>,
    ) -> Result<(), AppError> {
        f(self).inspect_err(|_| self.abort())
    }

    /// Collects the active view and refreshes the heading context.
    fn collect(&mut self) -> Result<(), AppError> {
        let result = self
            .registry
            .current_mut()
            .collect()
            .and_then(|()| self.server.refresh());
        if let Err(e) = result {
            error!("{}: {}", self.registry.current().kind(), e);
            self.abort();
            return Err(AppError::Collect(e));
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), AppError> {
        let screen = Screen::build(
            self.registry.current(),
            self.server.as_ref(),
            self.state.height,
            Local::now(),
        );
        self.renderer.draw(&screen)?;
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        match self.state.mode {
            Mode::HelpShown => Ok(self.renderer.draw_help()?),
            _ => self.render(),
        }
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.state.mode = Mode::Finished;
        self.renderer.close()?;
        Ok(())
    }

    fn abort(&mut self) {
        self.state.mode = Mode::Finished;
        if let Err(e) = self.renderer.close() {
            warn!("failed to restore terminal: {}", e);
        }
    }
}
