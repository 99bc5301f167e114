//! Key bindings: home-row columns and an arrow-key cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pickup(usize),
    Place(usize),
    Pop,
    CursorLeft,
    CursorRight,
    PickupAtCursor,
    PlaceAtCursor,
    Restart,
    Pause,
    Quit,
    None,
}

/// Map key event to game action. `s d f` pick up, `j k l` place, Space pops.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Char('s') => Action::Pickup(0),
        KeyCode::Char('d') => Action::Pickup(1),
        KeyCode::Char('f') => Action::Pickup(2),
        KeyCode::Char('j') => Action::Place(0),
        KeyCode::Char('k') => Action::Place(1),
        KeyCode::Char('l') => Action::Place(2),
        KeyCode::Char(' ') => Action::Pop,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Up => Action::PickupAtCursor,
        KeyCode::Down | KeyCode::Enter => Action::PlaceAtCursor,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Action {
        key_to_action(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_home_row_columns() {
        assert_eq!(press(KeyCode::Char('s')), Action::Pickup(0));
        assert_eq!(press(KeyCode::Char('f')), Action::Pickup(2));
        assert_eq!(press(KeyCode::Char('j')), Action::Place(0));
        assert_eq!(press(KeyCode::Char('l')), Action::Place(2));
        assert_eq!(press(KeyCode::Char(' ')), Action::Pop);
    }

    #[test]
    fn test_ctrl_c_quits_other_modifiers_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
        let alt_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_s), Action::None);
    }

    #[test]
    fn test_shifted_r_restarts() {
        let shift_r = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shift_r), Action::Restart);
    }

    #[test]
    fn test_cursor_keys() {
        assert_eq!(press(KeyCode::Left), Action::CursorLeft);
        assert_eq!(press(KeyCode::Up), Action::PickupAtCursor);
        assert_eq!(press(KeyCode::Enter), Action::PlaceAtCursor);
    }
}
