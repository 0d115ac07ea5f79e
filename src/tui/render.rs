//! What gets drawn, and the renderer contract.
//!
//! The control loop turns the active view into a [`Screen`] of finished text
//! lines and hands it to a [`Renderer`]. The terminal implementation lives
//! in [`TerminalRenderer`]; tests use a recording one.

use std::io::{self, Stdout};

use chrono::{DateTime, Local};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use super::widgets::{render_dashboard, render_help};
use crate::collector::ServerInfo;
use crate::fmt::format_uptime;
use crate::view::MetricView;

/// Bottom line of every screen.
pub const MENU: &str =
    "[+-] Delay  [<] Prev  [>] Next  [h]elp  [t] Abs/Rel  [q]uit  [z] Reset stats";

/// Lines above and below the content rows: heading, description, column
/// headings, totals, menu.
const FIXED_LINES: u16 = 5;

/// One fully formatted frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub heading: String,
    pub description: String,
    pub headings: String,
    /// Exactly `height - 5` lines, padded with empty rows.
    pub rows: Vec<String>,
    pub totals: String,
    pub menu: String,
}

impl Screen {
    /// Builds the frame for `view` on a terminal `height` lines tall.
    pub fn build(
        view: &dyn MetricView,
        server: &dyn ServerInfo,
        height: u16,
        now: DateTime<Local>,
    ) -> Self {
        let budget = usize::from(height.saturating_sub(FIXED_LINES));
        let mut rows = view.row_content();
        rows.truncate(budget);
        if rows.len() < budget {
            let empty = view.empty_row_content();
            rows.resize(budget, empty);
        }

        Self {
            heading: heading_line(view, server, now),
            description: view.description(),
            headings: view.headings(),
            rows,
            totals: view.total_row_content(),
            menu: MENU.to_string(),
        }
    }
}

/// `pstop 0.1.0 - 12:00:00 host / 8.0.36, up 1d 02:03:04   [REL] 12 seconds`
pub fn heading_line(
    view: &dyn MetricView,
    server: &dyn ServerInfo,
    now: DateTime<Local>,
) -> String {
    let mut line = format!(
        "{} {} - {} {} / {}, up {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        now.format("%H:%M:%S"),
        server.hostname(),
        server.mysql_version(),
        format_uptime(server.uptime())
    );
    if view.have_relative_stats() {
        if view.want_relative_stats() {
            let secs = match (view.first_collected(), view.last_collected()) {
                (Some(first), Some(last)) => (last - first).num_seconds().max(0),
                _ => 0,
            };
            line.push_str(&format!("   [REL] {} seconds", secs));
        } else {
            line.push_str("   [ABS]");
        }
    }
    line
}

/// Draws screens. Implementations own the output device.
pub trait Renderer {
    fn draw(&mut self, screen: &Screen) -> io::Result<()>;

    fn draw_help(&mut self) -> io::Result<()>;

    /// Records new terminal dimensions for the following draws.
    fn resize(&mut self, width: u16, height: u16) -> io::Result<()>;

    /// Current (width, height).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Releases the output device. Safe to call more than once.
    fn close(&mut self) -> io::Result<()>;
}

/// ratatui renderer on the alternate screen.
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    closed: bool,
}

impl TerminalRenderer {
    /// Enters raw mode and the alternate screen.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            closed: false,
        })
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, screen: &Screen) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            render_dashboard(frame, area, screen);
        })?;
        Ok(())
    }

    fn draw_help(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            render_help(frame, area);
        })?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.terminal.resize(Rect::new(0, 0, width, height))
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectError;
    use crate::view::ViewKind;

    struct StaticServer;

    impl ServerInfo for StaticServer {
        fn hostname(&self) -> &str {
            "db1"
        }

        fn mysql_version(&self) -> &str {
            "8.0.36"
        }

        fn uptime(&self) -> u64 {
            93_784
        }

        fn refresh(&mut self) -> Result<(), CollectError> {
            Ok(())
        }
    }

    struct FakeView {
        relative: bool,
        rows: usize,
    }

    impl MetricView for FakeView {
        fn kind(&self) -> ViewKind {
            ViewKind::MutexLatency
        }
        fn collect(&mut self) -> Result<(), CollectError> {
            Ok(())
        }
        fn reset_statistics(&mut self) {}
        fn headings(&self) -> String {
            "H".into()
        }
        fn row_content(&self) -> Vec<String> {
            (0..self.rows).map(|i| format!("row{}", i)).collect()
        }
        fn total_row_content(&self) -> String {
            "T".into()
        }
        fn empty_row_content(&self) -> String {
            "".into()
        }
        fn description(&self) -> String {
            "D".into()
        }
        fn have_relative_stats(&self) -> bool {
            true
        }
        fn want_relative_stats(&self) -> bool {
            self.relative
        }
        fn set_want_relative_stats(&mut self, want: bool) {
            self.relative = want;
        }
        fn first_collected(&self) -> Option<DateTime<Local>> {
            None
        }
        fn last_collected(&self) -> Option<DateTime<Local>> {
            None
        }
    }

    #[test]
    fn content_is_padded_to_budget() {
        let view = FakeView { relative: false, rows: 2 };
        let screen = Screen::build(&view, &StaticServer, 10, Local::now());
        assert_eq!(screen.rows, ["row0", "row1", "", "", ""]);
        assert_eq!(screen.menu, MENU);
    }

    #[test]
    fn content_is_truncated_to_budget() {
        let view = FakeView { relative: false, rows: 50 };
        let screen = Screen::build(&view, &StaticServer, 8, Local::now());
        assert_eq!(screen.rows.len(), 3);
        assert_eq!(screen.rows[2], "row2");
    }

    #[test]
    fn tiny_terminal_has_no_content_rows() {
        let view = FakeView { relative: false, rows: 3 };
        assert!(Screen::build(&view, &StaticServer, 4, Local::now()).rows.is_empty());
    }

    #[test]
    fn heading_shows_server_and_mode() {
        let abs = FakeView { relative: false, rows: 0 };
        let line = heading_line(&abs, &StaticServer, Local::now());
        assert!(line.contains(" db1 / 8.0.36, up 1d 02:03:04"));
        assert!(line.ends_with("[ABS]"));

        let rel = FakeView { relative: true, rows: 0 };
        assert!(heading_line(&rel, &StaticServer, Local::now()).ends_with("[REL] 0 seconds"));
    }
}
