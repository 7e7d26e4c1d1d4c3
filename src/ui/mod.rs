pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod settings_form;
pub mod stats_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use input_form::render_task_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_end_prompt;
use ratatui::{widgets::Block, Frame};
use settings_form::render_settings_form;
use stats_pane::render_stats_pane;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    if app.ui().dark_mode {
        f.render_widget(Block::default().style(styles::default_style(true)), size);
    }

    render_keybindings(f, layout.keybindings_area, app.ui_mode());

    render_list_pane(f, app, layout.list_area);
    render_timer_pane(f, app, layout.timer_area);
    render_stats_pane(f, app, layout.stats_area);

    // Forms take precedence over the end prompt
    if app.task_form.is_some() {
        render_task_form(f, app, size);
    } else if app.settings_form.is_some() {
        render_settings_form(f, app, size);
    } else {
        render_end_prompt(f, app, size);
    }
}
