use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

fn hints_for(mode: UiMode) -> &'static [&'static str] {
    match mode {
        UiMode::Normal => &[
            " ↑/↓ select   ",
            "Enter start   ",
            "Space pause/resume   ",
            "r reset   ",
            "a add   ",
            "e edit   ",
            "x delete   ",
            "o settings   ",
            "t theme   ",
            "q quit",
        ],
        UiMode::EndPrompt => &[" b take break   ", "c keep working   ", "r reset   ", "q quit"],
        UiMode::AddingTask | UiMode::EditingTask => {
            &[" Tab next field   ", "Enter save   ", "Esc cancel"]
        }
        UiMode::Settings => &[
            " ↑/↓ field   ",
            "+/- adjust   ",
            "Space toggle sound   ",
            "Enter save   ",
            "Esc cancel",
        ],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect, mode: UiMode) {
    let hints = Line::from(
        hints_for(mode)
            .iter()
            .map(|h| Span::raw(*h))
            .collect::<Vec<_>>(),
    );

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
