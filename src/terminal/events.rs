use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::terminal::state::SelectorState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Choose(String),
    Cancel,
}

pub fn handle_key(key: KeyEvent, state: &mut SelectorState) -> KeyOutcome {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyOutcome::Cancel,
        KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Cancel,

        KeyCode::Enter => match state.selected_value() {
            Some(v) => KeyOutcome::Choose(v.to_string()),
            None => KeyOutcome::Cancel,
        },

        KeyCode::Down | KeyCode::Char('j') => {
            state.move_selection(1);
            KeyOutcome::Continue
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_selection(-1);
            KeyOutcome::Continue
        }
        KeyCode::PageDown => {
            state.move_selection(10);
            KeyOutcome::Continue
        }
        KeyCode::PageUp => {
            state.move_selection(-10);
            KeyOutcome::Continue
        }
        KeyCode::Home => {
            state.select_first();
            KeyOutcome::Continue
        }
        KeyCode::End => {
            state.select_last();
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> SelectorState {
        SelectorState::new(
            "Select an email",
            vec!["a@example.com".into(), "b@example.com".into()],
        )
    }

    #[test]
    fn enter_chooses_highlighted() {
        let mut s = state();
        assert_eq!(handle_key(press(KeyCode::Char('j')), &mut s), KeyOutcome::Continue);
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut s),
            KeyOutcome::Choose("b@example.com".into())
        );
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let mut s = state();
        assert_eq!(handle_key(press(KeyCode::Esc), &mut s), KeyOutcome::Cancel);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c, &mut s), KeyOutcome::Cancel);
    }

    #[test]
    fn plain_c_does_nothing() {
        let mut s = state();
        assert_eq!(handle_key(press(KeyCode::Char('c')), &mut s), KeyOutcome::Continue);
    }
}
