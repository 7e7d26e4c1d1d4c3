use crate::app::{AppState, SettingsFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Label and displayed value for each settings row, in form order
fn rows(form: &SettingsFormState) -> Vec<(&'static str, String)> {
    let draft = &form.draft;
    vec![
        ("Focus (min)", draft.work_minutes.to_string()),
        ("Short break (min)", draft.short_break_minutes.to_string()),
        ("Long break (min)", draft.long_break_minutes.to_string()),
        ("Long break every", draft.long_break_every.to_string()),
        ("Sound", if draft.sound { "on" } else { "off" }.to_string()),
    ]
}

/// Render the settings modal
pub fn render_settings_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.settings_form else {
        return;
    };
    let modal_area = create_modal_area(area, 11);
    f.render_widget(Clear, modal_area);

    let mut lines = vec![Line::raw("")];
    for (idx, (label, value)) in rows(form).into_iter().enumerate() {
        let marker = if idx == form.selected_field { "▸ " } else { "  " };
        let value_span = if idx == form.selected_field {
            Span::styled(value, modal_title_style())
        } else {
            Span::raw(value)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{}{:<20}", marker, label)),
            value_span,
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("  Values below 1 are saved as 1"));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Settings ", modal_title_style()))
            .style(modal_bg_style(app.ui().dark_mode)),
    );

    f.render_widget(paragraph, modal_area);
}
