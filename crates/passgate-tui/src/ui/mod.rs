//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::{App, Screen};

/// Main render function - delegates to appropriate screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match app.state.current_screen {
        Screen::Passcode => screens::passcode::draw(frame, area, app),
        Screen::Lockout => screens::lockout::draw(frame, area, app),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyCode;
    use passgate_core::storage::HashParams;
    use passgate_core::{
        MemoryPasscodeStorage, PasscodeConfig, PasscodeStorage, UnavailableBiometrics,
    };
    use ratatui::backend::TestBackend;

    fn app_with(storage: Arc<MemoryPasscodeStorage>) -> App {
        let config = PasscodeConfig {
            max_attempts: 1,
            hash: HashParams::minimal(),
            ..PasscodeConfig::default()
        };
        App::new(
            &config,
            storage,
            Arc::new(UnavailableBiometrics),
            Theme::default(),
        )
        .unwrap()
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_passcode_screen_shows_prompt_and_dots() {
        let mut app = app_with(Arc::new(MemoryPasscodeStorage::with_params(
            HashParams::minimal(),
        )));
        app.handle_key(KeyCode::Char('2'));

        let screen = rendered(&app);
        assert!(screen.contains("Create Passcode"));
        assert!(screen.contains("Enter new passcode"));
        assert!(screen.contains("● ○ ○ ○"));
        assert!(screen.contains("⌫"));
    }

    #[test]
    fn test_lockout_screen() {
        let storage = Arc::new(MemoryPasscodeStorage::with_params(HashParams::minimal()));
        storage.store("2580").unwrap();
        let mut app = app_with(storage);

        for c in "1234".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        assert_eq!(app.state.current_screen, Screen::Lockout);

        let screen = rendered(&app);
        assert!(screen.contains("LOCKED"));
        assert!(screen.contains("Forgot passcode"));
    }
}
