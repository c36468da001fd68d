//! On-screen keypad and passcode dot row

use passgate_core::{Keypad, PassCodeButtonItem};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::KeypadAction;
use crate::ui::Theme;

/// Width of a single key cell, including spacing
const KEY_WIDTH: u16 = 7;

/// Height of a single key row
const KEY_HEIGHT: u16 = 1;

/// Label shown on a keypad key
pub fn key_label(item: &PassCodeButtonItem<KeypadAction>) -> String {
    match item {
        PassCodeButtonItem::Digit(digit) => digit.to_string(),
        PassCodeButtonItem::Backspace => "⌫".to_string(),
        PassCodeButtonItem::Biometrics => "◉".to_string(),
        PassCodeButtonItem::Custom(KeypadAction::Forgot) => "?".to_string(),
    }
}

/// Build the masked passcode row, one dot per expected digit
pub fn dot_row(entered: usize, length: usize) -> String {
    (0..length)
        .map(|i| if i < entered { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the masked passcode
pub fn render_dots(frame: &mut Frame, area: Rect, entered: usize, length: usize, theme: &Theme) {
    let style = if entered > 0 {
        theme.pin_dot()
    } else {
        theme.pin_placeholder()
    };

    let widget = Paragraph::new(dot_row(entered, length))
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// Render the keypad grid centered in `area`
pub fn render_keypad(
    frame: &mut Frame,
    area: Rect,
    keypad: &Keypad<KeypadAction>,
    theme: &Theme,
) {
    let grid_width = KEY_WIDTH * 3;
    let x = area.x + area.width.saturating_sub(grid_width) / 2;

    for (row_index, row) in keypad.rows().iter().enumerate() {
        let y = area.y + row_index as u16 * (KEY_HEIGHT + 1);
        if y >= area.y + area.height {
            break;
        }

        for (col_index, item) in row.iter().enumerate() {
            let Some(item) = item else {
                continue;
            };

            let style = match item {
                PassCodeButtonItem::Digit(_) => theme.key(),
                _ => theme.text_secondary(),
            };

            let cell = Rect::new(
                x + col_index as u16 * KEY_WIDTH,
                y,
                KEY_WIDTH.saturating_sub(1).min(area.width),
                KEY_HEIGHT,
            )
            .intersection(area);

            let widget = Paragraph::new(key_label(item))
                .style(style)
                .alignment(Alignment::Center);
            frame.render_widget(widget, cell);
        }
    }
}

/// Rows needed by [`render_keypad`]
pub fn keypad_height() -> u16 {
    4 * (KEY_HEIGHT + 1) - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use passgate_core::Digit;

    #[test]
    fn test_dot_row() {
        assert_eq!(dot_row(0, 4), "○ ○ ○ ○");
        assert_eq!(dot_row(2, 4), "● ● ○ ○");
        assert_eq!(dot_row(6, 6), "● ● ● ● ● ●");
    }

    #[test]
    fn test_key_labels() {
        let digit = Digit::new(7).unwrap();
        assert_eq!(key_label(&PassCodeButtonItem::Digit(digit)), "7");
        assert_eq!(key_label(&PassCodeButtonItem::Backspace), "⌫");
        assert_eq!(key_label(&PassCodeButtonItem::Biometrics), "◉");
        assert_eq!(
            key_label(&PassCodeButtonItem::Custom(KeypadAction::Forgot)),
            "?"
        );
    }

    #[test]
    fn test_keypad_height() {
        assert_eq!(keypad_height(), 7);
    }
}
