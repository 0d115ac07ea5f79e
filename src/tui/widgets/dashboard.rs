//! The main metric screen.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::tui::render::Screen;
use crate::tui::style::Styles;

/// Renders a [`Screen`]: heading, inverted description, bold column
/// headings, content rows, bold totals and the key menu.
pub fn render_dashboard(frame: &mut Frame, area: Rect, screen: &Screen) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Heading
        Constraint::Length(1), // Description
        Constraint::Length(1), // Column headings
        Constraint::Min(0),    // Rows
        Constraint::Length(1), // Totals
        Constraint::Length(1), // Menu
    ])
    .split(area);

    let line = |text: &str| Paragraph::new(Line::raw(text.to_string()));

    frame.render_widget(line(&screen.heading).style(Styles::default()), chunks[0]);
    frame.render_widget(line(&screen.description).style(Styles::description()), chunks[1]);
    frame.render_widget(line(&screen.headings).style(Styles::bold()), chunks[2]);

    let rows: Vec<Line> = screen.rows.iter().map(|r| Line::raw(r.clone())).collect();
    frame.render_widget(Paragraph::new(rows).style(Styles::default()), chunks[3]);

    frame.render_widget(line(&screen.totals).style(Styles::bold()), chunks[4]);
    frame.render_widget(line(&screen.menu).style(Styles::default()), chunks[5]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Modifier;

    #[test]
    fn lines_land_on_fixed_rows() {
        let screen = Screen {
            heading: "head".into(),
            description: "desc".into(),
            headings: "cols".into(),
            rows: vec!["r1".into(), "r2".into(), "".into()],
            totals: "sum".into(),
            menu: "menu".into(),
        };
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, &screen);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row_text = |y: u16| -> String {
            (0..20u16)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
                .trim_end()
                .to_string()
        };
        assert_eq!(row_text(0), "head");
        assert_eq!(row_text(1), "desc");
        assert_eq!(row_text(3), "r1");
        assert_eq!(row_text(6), "sum");
        assert_eq!(row_text(7), "menu");
        assert!(buffer[(0, 1)].modifier.contains(Modifier::REVERSED));
        assert!(buffer[(0, 6)].modifier.contains(Modifier::BOLD));
    }
}
