//! Full-screen help page.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::style::Styles;
use crate::view::ViewKind;

const KEYS: &[(&str, &str)] = &[
    ("-", "reduce the poll interval by 1 second (minimum 1 second)"),
    ("+", "increase the poll interval by 1 second"),
    ("h, ?", "this help screen"),
    ("q, Esc", "quit"),
    ("t", "toggle between values since the last reset and absolute values"),
    ("z", "reset statistics"),
    ("Tab, Right, >", "next view"),
    ("Left, <", "previous view"),
];

/// Help text lines, without styling frame.
pub fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!(
            "{} version {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )),
        Line::from(""),
        Line::from("Shows the top I/O and wait information from performance_schema."),
        Line::from(""),
        Line::from(Span::styled("Keys:", Styles::help_section())),
    ];
    for (key, what) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>14}", key), Styles::help_key()),
            Span::raw(format!("  {}", what)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Views:", Styles::help_section())));
    for kind in ViewKind::all() {
        lines.push(Line::from(format!("{:>14}", kind.name())));
    }
    lines
}

/// Renders the help page over the whole area.
pub fn render_help(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Styles::help_border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let paragraph = Paragraph::new(help_lines())
        .wrap(Wrap { trim: false })
        .style(Styles::default());
    frame.render_widget(paragraph, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Styles::dim()),
        Span::styled("h", Styles::help_key()),
        Span::styled(" or any key to return", Styles::dim()),
    ]));
    frame.render_widget(footer, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_view() {
        let text: Vec<String> = help_lines().iter().map(|l| l.to_string()).collect();
        for kind in ViewKind::all() {
            assert!(text.iter().any(|l| l.trim() == kind.name()));
        }
    }
}
