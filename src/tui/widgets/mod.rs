//! TUI widgets.

mod dashboard;
mod help;

pub use dashboard::render_dashboard;
pub use help::render_help;
