//! The exercise controller: a view → rebuild → review sequencer driven by a
//! single countdown.
//!
//! The controller owns the only [`Session`] and the only [`Countdown`]. UI code
//! calls the entry points on key presses and reads the accessors when drawing.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::countdown::{Countdown, CountdownTick};
use crate::image::{ImageRef, ImageSource};
use crate::session::{DurationError, Durations, Mode, Phase, Session};

pub const REBUILD_INSTRUCTIONS: &str =
    "Close your eyes and rebuild it mentally:\n\n• Overall shape\n• Colors\n• Object positions";
pub const REVIEW_INSTRUCTIONS: &str = "Open your eyes. Notice what you missed.";
pub const COMPLETE_NOTICE: &str = "Exercise complete.";
pub const IDLE_INSTRUCTIONS: &str = "Press (s) to begin the exercise.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExerciseError {
    #[error("the next round is not available yet")]
    NotReady,
    #[error("the exercise is complete; restart to play again")]
    SequenceComplete,
    #[error("a cycle is already running")]
    CycleInProgress,
    #[error("repeat is only available in focus mode")]
    NotFullscreen,
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// A value shown on the timer: the phase it belongs to and the seconds left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFrame {
    pub phase: Phase,
    pub remaining: u32,
}

/// What one whole-second tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    /// The value rendered by this tick, including the final zero
    pub frame: Option<TimerFrame>,
    /// Phase entered because the countdown expired
    pub entered: Option<Phase>,
}

pub struct ExerciseController {
    session: Session,
    countdown: Countdown,
    source: Box<dyn ImageSource>,
    image: Option<ImageRef>,
    fullscreen: bool,
}

impl std::fmt::Debug for ExerciseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseController")
            .field("session", &self.session)
            .field("countdown", &self.countdown)
            .field("image", &self.image)
            .field("fullscreen", &self.fullscreen)
            .finish()
    }
}

impl ExerciseController {
    pub fn new(durations: Durations, source: Box<dyn ImageSource>) -> Self {
        Self {
            session: Session::new(durations),
            countdown: Countdown::new(),
            source,
            image: None,
            fullscreen: false,
        }
    }

    /// Start (or restart) the bounded exercise from round one.
    ///
    /// Any running countdown is cancelled first.
    pub fn start_sequence(&mut self) {
        info!("starting exercise");
        self.session.round = 0;
        self.start_round();
    }

    /// Move on to the next bounded round after a review. Repeat cycles run in
    /// between do not take this away.
    pub fn advance_round(&mut self) -> Result<(), ExerciseError> {
        if self.session.is_complete() {
            return Err(ExerciseError::SequenceComplete);
        }
        if !self.next_enabled() {
            return Err(ExerciseError::NotReady);
        }
        self.start_round();
        Ok(())
    }

    /// Begin one unbounded cycle. Only offered in focus mode and never while a
    /// cycle is running.
    pub fn start_repeat_cycle(&mut self) -> Result<(), ExerciseError> {
        if !self.fullscreen {
            return Err(ExerciseError::NotFullscreen);
        }
        if self.session.is_mid_cycle() {
            return Err(ExerciseError::CycleInProgress);
        }
        debug!(round = self.session.round, "starting repeat cycle");
        self.session.mode = Mode::Repeat;
        self.begin_viewing();
        Ok(())
    }

    /// Change durations. A running phase keeps its countdown; the new values
    /// apply from the next phase that starts.
    pub fn set_durations(&mut self, view_secs: i64, rebuild_secs: i64) -> Result<(), ExerciseError> {
        self.apply_durations(Durations::new(view_secs, rebuild_secs)?);
        Ok(())
    }

    pub fn apply_durations(&mut self, durations: Durations) {
        debug!(
            view = durations.view_secs(),
            rebuild = durations.rebuild_secs(),
            "durations updated"
        );
        self.session.durations = durations;
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Advance the countdown by one whole second and run any transition.
    pub fn tick(&mut self) -> Step {
        match self.countdown.tick() {
            CountdownTick::Inactive => Step::default(),
            CountdownTick::Running { phase, remaining } => Step {
                frame: Some(TimerFrame { phase, remaining }),
                entered: None,
            },
            CountdownTick::Expired { phase } => {
                let entered = self.on_expire(phase);
                Step {
                    frame: Some(TimerFrame {
                        phase,
                        remaining: 0,
                    }),
                    entered: Some(entered),
                }
            }
        }
    }

    /// Feed wall-clock time; ticks once per whole second that has elapsed.
    ///
    /// A phase change drops the remainder of the elapsed time so the next
    /// countdown always shows its full first second.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Step> {
        let due = self.countdown.accumulate(elapsed);
        let mut steps = Vec::new();
        for _ in 0..due {
            let step = self.tick();
            let transitioned = step.entered.is_some();
            steps.push(step);
            if transitioned {
                break;
            }
        }
        steps
    }

    fn start_round(&mut self) {
        self.session.mode = Mode::Bounded;
        self.session.clear_progress();
        self.session.round += 1;
        debug!(round = self.session.round, "starting round");
        self.begin_viewing();
    }

    fn begin_viewing(&mut self) {
        self.image = Some(self.source.next_image());
        self.enter(Phase::Viewing);
    }

    fn on_expire(&mut self, phase: Phase) -> Phase {
        let next = match phase {
            Phase::Viewing => Phase::Rebuilding,
            Phase::Rebuilding => Phase::Reviewing,
            // countdowns only run in timed phases
            Phase::Idle | Phase::Reviewing => phase,
        };
        self.enter(next);
        next
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.session.phase, to = %phase, round = self.session.round, "phase transition");
        self.session.phase = phase;
        match phase {
            Phase::Viewing => self
                .countdown
                .start(self.session.durations.view_secs(), Phase::Viewing),
            Phase::Rebuilding => self
                .countdown
                .start(self.session.durations.rebuild_secs(), Phase::Rebuilding),
            Phase::Reviewing => {
                self.countdown.cancel();
                let was_complete = self.session.is_complete();
                self.session.record_review();
                if !was_complete && self.session.is_complete() {
                    info!(rounds = self.session.round, "exercise complete");
                }
            }
            Phase::Idle => self.countdown.cancel(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn round(&self) -> u32 {
        self.session.round
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn durations(&self) -> Durations {
        self.session.durations
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.is_active()
    }

    pub fn timer_frame(&self) -> Option<TimerFrame> {
        match (self.countdown.phase(), self.countdown.remaining()) {
            (Some(phase), Some(remaining)) => Some(TimerFrame { phase, remaining }),
            _ => None,
        }
    }

    /// "Time left: Ns" while a countdown runs, empty otherwise
    pub fn timer_text(&self) -> String {
        self.countdown
            .remaining()
            .map(|s| format!("Time left: {}s", s))
            .unwrap_or_default()
    }

    /// Large timer overlay, only in focus mode
    pub fn fullscreen_timer_visible(&self) -> bool {
        self.fullscreen && self.countdown.is_active()
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageRef> {
        self.image.as_mut()
    }

    pub fn image_visible(&self) -> bool {
        self.image.is_some() && matches!(self.session.phase, Phase::Viewing | Phase::Reviewing)
    }

    pub fn instructions(&self) -> String {
        match self.session.phase {
            Phase::Idle => IDLE_INSTRUCTIONS.to_string(),
            Phase::Viewing => {
                let secs = self
                    .countdown
                    .duration()
                    .unwrap_or(self.session.durations.view_secs());
                format!("Look at the image for {} seconds.", secs)
            }
            Phase::Rebuilding => REBUILD_INSTRUCTIONS.to_string(),
            Phase::Reviewing
                if self.session.is_complete() && self.session.mode == Mode::Bounded =>
            {
                format!("{}\n\n{}", REVIEW_INSTRUCTIONS, COMPLETE_NOTICE)
            }
            Phase::Reviewing => REVIEW_INSTRUCTIONS.to_string(),
        }
    }

    /// The advance-to-next-round affordance
    pub fn next_enabled(&self) -> bool {
        self.session.next_ready && self.session.phase == Phase::Reviewing
    }

    /// The repeat affordance: shown in focus mode, usable between cycles
    pub fn repeat_visible(&self) -> bool {
        self.fullscreen
    }

    pub fn repeat_enabled(&self) -> bool {
        !self.session.is_mid_cycle()
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    pub fn start_label(&self) -> &'static str {
        if self.session.is_complete() {
            "Restart"
        } else {
            "Start"
        }
    }
}
