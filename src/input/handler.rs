use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+C always quits, whatever has focus
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode() {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::EndPrompt => handle_end_prompt_mode(app, key),
        UiMode::AddingTask | UiMode::EditingTask => handle_task_form_mode(app, key),
        UiMode::Settings => handle_settings_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),

        // Start a focus interval on the selected task
        KeyCode::Enter => app.start_selected(),
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),

        KeyCode::Char('o') | KeyCode::Char('O') => app.open_settings(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_dark_mode(),

        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while the end-of-session prompt is showing
fn handle_end_prompt_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('b') | KeyCode::Char('B') => app.confirm_break(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.continue_work(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the add/edit task form
fn handle_task_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_task_form(),
        KeyCode::Esc => app.cancel_task_form(),

        // Cycle title -> description -> estimate
        KeyCode::Tab => app.task_form_toggle_field(),
        KeyCode::Backspace => app.task_form_backspace(),
        KeyCode::Char(c) => app.task_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the settings modal
fn handle_settings_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up => app.settings_form_move(false),
        KeyCode::Down | KeyCode::Tab => app.settings_form_move(true),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => app.settings_form_adjust(1),
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Left => app.settings_form_adjust(-1),
        KeyCode::Char(' ') => app.settings_form_toggle_sound(),
        KeyCode::Enter => app.save_settings_form(),
        KeyCode::Esc => app.cancel_settings_form(),
        _ => {}
    }
    Ok(false)
}
