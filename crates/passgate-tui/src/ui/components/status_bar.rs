//! Status bar component

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render a one-line status message, errors taking precedence
pub fn render_status_line(
    frame: &mut Frame,
    area: Rect,
    error: Option<&str>,
    status: Option<&str>,
    theme: &Theme,
) {
    let line = match (error, status) {
        (Some(error), _) => Span::styled(error.to_string(), theme.danger()),
        (None, Some(status)) => Span::styled(status.to_string(), theme.success()),
        (None, None) => return,
    };

    let paragraph = Paragraph::new(Line::from(line)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render help hints in footer
pub fn render_help_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], theme: &Theme) {
    let hint_spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(format!("[{}]", key), theme.text_highlight()),
                Span::styled(format!(" {} ", action), theme.text_muted()),
                Span::raw(" "),
            ]
        })
        .collect();

    let line = Line::from(hint_spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
