//! Passcode entry screen shared by the create, enter and change flows

use passgate_core::PassCodeFlowType;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::components::keypad::{keypad_height, render_dots, render_keypad};
use crate::ui::components::status_bar::{render_help_footer, render_status_line};
use crate::ui::layout::centered_rect_fixed;

/// Dialog title for a flow
fn dialog_title(flow_type: &PassCodeFlowType) -> String {
    match flow_type {
        PassCodeFlowType::Create => " Create Passcode ".to_string(),
        PassCodeFlowType::Enter => " Unlock ".to_string(),
        PassCodeFlowType::Change => " Change Passcode ".to_string(),
        PassCodeFlowType::Custom(id) => format!(" {} ", id),
    }
}

/// Draw the passcode screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let view_model = &app.view_model;

    let dialog = centered_rect_fixed(44, 20, area);

    let block = Block::default()
        .title(dialog_title(&view_model.flow_type()))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),               // Prompt
            Constraint::Length(1),               // Spacer
            Constraint::Length(1),               // Dots
            Constraint::Length(1),               // Biometrics indicator
            Constraint::Length(1),               // Error / status
            Constraint::Length(1),               // Spacer
            Constraint::Length(keypad_height()), // Keypad
            Constraint::Min(0),                  // Spacer
            Constraint::Length(1),               // Help
        ])
        .split(inner);

    let prompt = Paragraph::new(view_model.state_title())
        .style(theme.text())
        .alignment(Alignment::Center);
    frame.render_widget(prompt, chunks[0]);

    render_dots(
        frame,
        chunks[2],
        view_model.entered_digits_count(),
        view_model.passcode_length(),
        theme,
    );

    if app.state.awaiting_biometrics() {
        let spinner = ['◐', '◓', '◑', '◒'][(app.tick % 4) as usize];
        let waiting = Paragraph::new(format!("{} Waiting for biometrics", spinner))
            .style(theme.info())
            .alignment(Alignment::Center);
        frame.render_widget(waiting, chunks[3]);
    }

    render_status_line(
        frame,
        chunks[4],
        app.state.error_message.as_deref(),
        app.state.status_message.as_deref(),
        theme,
    );

    render_keypad(frame, chunks[6], &app.keypad, theme);

    let mut hints = vec![("0-9", "Digit"), ("⌫", "Delete")];
    if view_model.can_authenticate_with_biometrics() {
        hints.push(("b", "Biometrics"));
    }
    hints.push(("f", "Forgot"));
    hints.push(("q", "Quit"));
    render_help_footer(frame, chunks[8], &hints, theme);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_titles() {
        assert_eq!(dialog_title(&PassCodeFlowType::Create), " Create Passcode ");
        assert_eq!(dialog_title(&PassCodeFlowType::Enter), " Unlock ");
        assert_eq!(
            dialog_title(&PassCodeFlowType::Custom("wipe".to_string())),
            " wipe "
        );
    }
}
