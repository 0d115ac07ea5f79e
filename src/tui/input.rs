//! Keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event::Event;

/// Maps a key press to a control-loop event.
pub fn map_key(key: KeyEvent) -> Event {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('z') if ctrl => Event::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Event::Quit,
        KeyCode::Char('-') => Event::DecreaseInterval,
        KeyCode::Char('+') => Event::IncreaseInterval,
        KeyCode::Char('h') | KeyCode::Char('?') => Event::Help,
        KeyCode::Char('t') | KeyCode::Char('r') => Event::ToggleRelative,
        KeyCode::Char('z') => Event::ResetStatistics,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('>') => Event::ViewNext,
        KeyCode::Left | KeyCode::Char('<') => Event::ViewPrev,
        _ => Event::OtherKey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Event::Quit);
        assert_eq!(map_key(key(KeyCode::Esc)), Event::Quit);
        assert_eq!(map_key(ctrl('c')), Event::Quit);
        assert_eq!(map_key(ctrl('z')), Event::Quit);
    }

    #[test]
    fn plain_z_resets_statistics() {
        assert_eq!(map_key(key(KeyCode::Char('z'))), Event::ResetStatistics);
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(map_key(key(KeyCode::Tab)), Event::ViewNext);
        assert_eq!(map_key(key(KeyCode::Right)), Event::ViewNext);
        assert_eq!(map_key(key(KeyCode::Left)), Event::ViewPrev);
        assert_eq!(map_key(key(KeyCode::Char('<'))), Event::ViewPrev);
    }

    #[test]
    fn interval_and_mode_keys() {
        assert_eq!(map_key(key(KeyCode::Char('-'))), Event::DecreaseInterval);
        assert_eq!(map_key(key(KeyCode::Char('+'))), Event::IncreaseInterval);
        assert_eq!(map_key(key(KeyCode::Char('t'))), Event::ToggleRelative);
        assert_eq!(map_key(key(KeyCode::Char('?'))), Event::Help);
    }

    #[test]
    fn unmapped_key_is_other() {
        assert_eq!(map_key(key(KeyCode::Char('x'))), Event::OtherKey);
        assert_eq!(map_key(key(KeyCode::Enter)), Event::OtherKey);
    }
}
