//! Lockout screen displayed when too many passcode attempts fail

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::components::status_bar::render_help_footer;
use crate::ui::layout::centered_rect;

/// Draw the lockout screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let dialog = centered_rect(50, 40, area);

    // Dialog box with danger styling
    let block = Block::default()
        .title(" Locked ")
        .title_style(theme.danger())
        .borders(Borders::ALL)
        .border_style(theme.danger());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Warning icon
            Constraint::Length(3), // Message
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let icon_widget = Paragraph::new("⚠  LOCKED  ⚠")
        .style(theme.danger())
        .alignment(Alignment::Center);
    frame.render_widget(icon_widget, chunks[0]);

    let detail = app
        .state
        .error_message
        .as_deref()
        .unwrap_or("Too many failed attempts");
    let message = format!("{}.\nForget the passcode to set a new one.", detail);
    let message_widget = Paragraph::new(message)
        .style(theme.text())
        .alignment(Alignment::Center);
    frame.render_widget(message_widget, chunks[1]);

    render_help_footer(
        frame,
        chunks[3],
        &[("f", "Forgot passcode"), ("q", "Quit")],
        theme,
    );
}
