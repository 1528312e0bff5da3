use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::exercise::{ExerciseController, ExerciseError};
use crate::fullscreen::{FocusMode, Fullscreen};
use crate::image::{open_with_fallback, ImageOpener, ImageSource};
use crate::preferences::{PreferencesManager, Theme, PRESETS};
use crate::session::Phase;

/// Everything the screen shows, plus the glue between key presses and the
/// exercise controller.
pub struct App {
    pub controller: ExerciseController,
    pub preferences: PreferencesManager,
    pub focus: FocusMode,
    pub settings_open: bool,
    pub open_in_browser: bool,
    pub should_quit: bool,
    opener: Box<dyn ImageOpener>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("controller", &self.controller)
            .field("preferences", &self.preferences)
            .field("focus", &self.focus)
            .field("settings_open", &self.settings_open)
            .field("open_in_browser", &self.open_in_browser)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(
        preferences: PreferencesManager,
        source: Box<dyn ImageSource>,
        opener: Box<dyn ImageOpener>,
    ) -> Self {
        let controller = ExerciseController::new(preferences.durations(), source);
        Self {
            controller,
            preferences,
            focus: FocusMode::default(),
            settings_open: false,
            open_in_browser: false,
            should_quit: false,
            opener,
        }
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    /// Feed elapsed wall-clock time to the countdown
    pub fn on_elapsed(&mut self, elapsed: Duration) {
        for step in self.controller.advance(elapsed) {
            if let Some(phase) = step.entered {
                debug!(%phase, "entered phase");
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.on_escape(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => self.start_sequence(),
            KeyCode::Char('n') => {
                let result = self.controller.advance_round();
                self.after_trigger(result);
            }
            KeyCode::Char('r') => {
                let result = self.controller.start_repeat_cycle();
                self.after_trigger(result);
            }
            KeyCode::Char('f') => self.toggle_fullscreen(),
            KeyCode::Char('t') => {
                let theme = self.preferences.toggle_theme();
                debug!(%theme, "theme toggled");
            }
            KeyCode::Char('p') => self.settings_open = !self.settings_open,
            KeyCode::Char('o') => self.open_current_image(),
            KeyCode::Char(c @ '1'..='3') if self.settings_open => {
                let idx = c as usize - '1' as usize;
                let durations = self.preferences.apply_preset(&PRESETS[idx]);
                self.controller.apply_durations(durations);
            }
            KeyCode::Left if self.settings_open => self.nudge_view(-1),
            KeyCode::Right if self.settings_open => self.nudge_view(1),
            KeyCode::Down if self.settings_open => self.nudge_rebuild(-1),
            KeyCode::Up if self.settings_open => self.nudge_rebuild(1),
            _ => {}
        }
    }

    /// Set both durations from outside the settings panel (CLI overrides)
    pub fn set_durations(&mut self, view_secs: i64, rebuild_secs: i64) -> Result<(), ExerciseError> {
        let durations = self.preferences.update(view_secs, rebuild_secs)?;
        self.controller.apply_durations(durations);
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.set_theme(theme);
    }

    pub fn toggle_fullscreen(&mut self) {
        let on = self.focus.toggle();
        self.controller.set_fullscreen(on);
        if on {
            // the panel has no place in focus mode
            self.settings_open = false;
        }
        debug!(on, "focus mode");
    }

    fn on_escape(&mut self) {
        if self.focus.is_fullscreen() {
            self.toggle_fullscreen();
        } else if self.settings_open {
            self.settings_open = false;
        } else {
            self.should_quit = true;
        }
    }

    fn start_sequence(&mut self) {
        self.controller.start_sequence();
        self.after_trigger(Ok(()));
    }

    fn after_trigger(&mut self, result: Result<(), ExerciseError>) {
        match result {
            Ok(()) => {
                info!(round = self.controller.round(), "new image");
                if self.open_in_browser {
                    self.open_current_image();
                }
            }
            Err(err) => debug!(error = %err, "trigger ignored"),
        }
    }

    fn open_current_image(&mut self) {
        // only while the image is meant to be seen
        if self.controller.phase() == Phase::Rebuilding {
            return;
        }
        let opener = &self.opener;
        if let Some(image) = self.controller.image_mut() {
            if let Err(err) = open_with_fallback(image, opener.as_ref()) {
                warn!(error = %err, "could not open image");
            }
        }
    }

    fn nudge_view(&mut self, steps: i32) {
        let durations = self.preferences.nudge_view(steps);
        self.controller.apply_durations(durations);
    }

    fn nudge_rebuild(&mut self, steps: i32) {
        let durations = self.preferences.nudge_rebuild(steps);
        self.controller.apply_durations(durations);
    }
}
