//! Control-loop state.

/// Control-loop mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Running,
    HelpShown,
    /// Terminal; no further fetches or renders.
    Finished,
}

/// Navigation state shared by every view.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub mode: Mode,
    /// Relative (since baseline) or absolute values, for all views.
    pub want_relative: bool,
    pub width: u16,
    pub height: u16,
}

impl AppState {
    pub fn new(want_relative: bool, width: u16, height: u16) -> Self {
        Self {
            mode: Mode::Running,
            want_relative,
            width,
            height,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.mode == Mode::Finished
    }
}
