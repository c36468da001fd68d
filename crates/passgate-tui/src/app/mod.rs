//! Application state and event handling

mod config;
mod state;

pub use config::{BiometricsMode, TuiConfig};
pub use state::{AppState, Screen};

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use passgate_core::{
    BiometricsService, ButtonOutcome, ChannelDelegate, Digit, DigitOutcome, FlowChain,
    FlowOrchestrator, Keypad, LifecycleEvent, LifecycleHub, PassCodeButtonItem, PassCodeFlowType,
    PasscodeConfig, PasscodeStorage, PasscodeViewModel, StandardCoordinatorFactory,
    ViewModelEvent,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::ui::{self, Theme};

/// Application-specific keypad button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadAction {
    /// Forget the stored passcode and create a new one
    Forgot,
}

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Colour palette
    pub theme: Theme,

    /// Keypad layout
    pub keypad: Keypad<KeypadAction>,

    /// Passcode view-model
    pub view_model: PasscodeViewModel,

    /// Delegate output of the view-model
    view_model_events: mpsc::UnboundedReceiver<ViewModelEvent>,

    /// Flow hand-off
    orchestrator: FlowOrchestrator,

    /// Simulated app lifecycle
    lifecycle: LifecycleHub,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for animations
    pub tick: u64,

    /// Last tick time
    last_tick: Instant,
}

impl App {
    /// Create a new application instance and start the first flow
    pub fn new(
        config: &PasscodeConfig,
        storage: Arc<dyn PasscodeStorage>,
        biometrics: Arc<dyn BiometricsService>,
        theme: Theme,
    ) -> Result<Self> {
        config.validate()?;

        let factory = StandardCoordinatorFactory::new(config, storage.clone(), biometrics);
        let orchestrator = FlowOrchestrator::new(FlowChain::default(), factory);

        let flow = FlowOrchestrator::initial_flow(storage.as_ref())?;
        let coordinator = orchestrator
            .coordinator_for(&flow)
            .with_context(|| format!("No coordinator for {} flow", flow))?;

        let (delegate, view_model_events) = ChannelDelegate::channel();
        let mut view_model = PasscodeViewModel::new(config.settings(), coordinator, storage)
            .with_validator(config.validator())
            .with_delegate(delegate);

        let lifecycle = LifecycleHub::new();
        view_model.bind_lifecycle(&lifecycle);

        let mut app = Self {
            state: AppState::new(),
            theme,
            keypad: Keypad::new(
                Some(PassCodeButtonItem::Custom(KeypadAction::Forgot)),
                Some(PassCodeButtonItem::Backspace),
            ),
            view_model,
            view_model_events,
            orchestrator,
            lifecycle,
            should_quit: false,
            tick: 0,
            last_tick: Instant::now(),
        };

        tracing::info!("Starting with {} flow", flow);
        app.view_model.start_flow();
        app.drain_view_model_events()?;
        Ok(app)
    }

    /// Run the application main loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            // Draw UI
            terminal.draw(|frame| ui::render(frame, self))?;

            // Handle events
            let timeout = tick_rate
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            // Apply biometric verdicts and lifecycle events
            self.view_model.pump();
            if let Err(e) = self.drain_view_model_events() {
                self.report(e);
            }

            // Update tick
            if self.last_tick.elapsed() >= tick_rate {
                self.tick = self.tick.wrapping_add(1);
                self.last_tick = Instant::now();
            }
        }

        Ok(())
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyCode) {
        // Global quit handler
        if matches!(key, KeyCode::Esc | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        let result = match self.state.current_screen {
            Screen::Passcode => self.handle_passcode_key(key),
            Screen::Lockout => self.handle_lockout_key(key),
        };

        if let Err(e) = result.and_then(|()| self.drain_view_model_events()) {
            self.report(e);
        }
    }

    fn handle_passcode_key(&mut self, key: KeyCode) -> Result<()> {
        let item = match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let digit =
                    Digit::try_from(c).map_err(|c| anyhow::anyhow!("Not a digit: {}", c))?;
                PassCodeButtonItem::Digit(digit)
            }
            KeyCode::Backspace => PassCodeButtonItem::Backspace,
            KeyCode::Char('b') => PassCodeButtonItem::Biometrics,
            KeyCode::Char('f') => PassCodeButtonItem::Custom(KeypadAction::Forgot),
            KeyCode::Char('p') => {
                self.lifecycle.notify(LifecycleEvent::DidEnterBackground);
                self.state.status_message = Some("App sent to background".to_string());
                return Ok(());
            }
            KeyCode::Char('r') => {
                self.lifecycle.notify(LifecycleEvent::WillEnterForeground);
                self.state.status_message = Some("App back in foreground".to_string());
                return Ok(());
            }
            _ => return Ok(()),
        };

        self.press(item)
    }

    fn handle_lockout_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('f') => self.forgot_passcode(),
            _ => Ok(()),
        }
    }

    /// Feed one keypad button to the view-model
    pub fn press(&mut self, item: PassCodeButtonItem<KeypadAction>) -> Result<()> {
        match self.view_model.handle_button(item)? {
            ButtonOutcome::Digit(DigitOutcome::Invalid(_)) => {
                // The reason arrives through the delegate channel
                self.view_model.reset_entered_code();
            }
            ButtonOutcome::Digit(DigitOutcome::Pending { .. }) => {
                self.state.error_message = None;
            }
            ButtonOutcome::Biometrics(None) => {
                self.state.status_message =
                    Some("Biometrics not available for this step".to_string());
            }
            ButtonOutcome::Custom(KeypadAction::Forgot) => self.forgot_passcode()?,
            ButtonOutcome::Digit(_) | ButtonOutcome::Removed(_) | ButtonOutcome::Biometrics(_) => {}
        }
        Ok(())
    }

    /// Drop the stored passcode and start over with a new one
    fn forgot_passcode(&mut self) -> Result<()> {
        tracing::info!("Passcode reset requested");
        self.view_model.reset_stored_code()?;

        let coordinator = self
            .orchestrator
            .coordinator_for(&PassCodeFlowType::Create)
            .context("No coordinator for create flow")?;
        self.view_model.update_coordinator(coordinator);
        self.view_model.start_flow();

        self.state.clear_messages();
        self.state.status_message = Some("Stored passcode cleared".to_string());
        Ok(())
    }

    /// Apply delegate output and chain finished flows
    pub fn drain_view_model_events(&mut self) -> Result<()> {
        while let Ok(event) = self.view_model_events.try_recv() {
            match event {
                ViewModelEvent::Invalid { failed_rules, .. } => {
                    self.state.apply_violations(&failed_rules);
                }
                ViewModelEvent::Transition(state) => {
                    self.state.apply_state(&state);
                    // Starting the next flow queues its own transition
                    self.orchestrator.advance(&mut self.view_model, &state)?;
                }
            }
        }
        Ok(())
    }

    fn report(&mut self, error: anyhow::Error) {
        tracing::error!("{:#}", error);
        self.state.error_message = Some(error.to_string());
    }
}
