//! Colour palette for the passcode screens

use ratatui::style::{Color, Modifier, Style};

/// Passgate colour palette
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub success: Color,
    pub danger: Color,
    pub info: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub key_background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 188, 212),          // #00BCD4
            success: Color::Rgb(76, 175, 80),         // #4CAF50
            danger: Color::Rgb(244, 67, 54),          // #F44336
            info: Color::Rgb(33, 150, 243),           // #2196F3
            border_focused: Color::Rgb(0, 188, 212),  // #00BCD4
            text_primary: Color::Rgb(250, 250, 250),  // #FAFAFA
            text_secondary: Color::Rgb(189, 189, 189), // #BDBDBD
            text_muted: Color::Rgb(117, 117, 117),    // #757575
            key_background: Color::Rgb(55, 55, 55),   // #373737
        }
    }
}

impl Theme {
    /// Palette for low-colour or low-vision terminals
    pub fn high_contrast() -> Self {
        Self {
            accent: Color::Yellow,
            border_focused: Color::Yellow,
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            key_background: Color::DarkGray,
            ..Self::default()
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Key names in the help footer
    pub fn text_highlight(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Dialog titles
    pub fn title(&self) -> Style {
        self.text_highlight()
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Errors and the lockout dialog
    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Digit keys on the keypad
    pub fn key(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.key_background)
            .add_modifier(Modifier::BOLD)
    }

    /// Filled dots of the passcode row
    pub fn pin_dot(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Dot row before anything is typed
    pub fn pin_placeholder(&self) -> Style {
        Style::default().fg(self.text_muted)
    }
}
