use crate::app::Form;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormOutcome {
    Submit,
    Cancel,
}

/// Keys shared by every form. Returns what the caller should do, if anything.
pub(super) fn handle_form_key(key: KeyEvent, form: &mut Form) -> Option<FormOutcome> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => return Some(FormOutcome::Submit),
        KeyCode::Esc => return Some(FormOutcome::Cancel),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Backspace => form.backspace(),
        // Ctrl+X: clear the focused field
        KeyCode::Char('x') if ctrl => form.clear_focused(),
        KeyCode::Char(c) if !ctrl => form.input_char(c),
        _ => {}
    }
    None
}
