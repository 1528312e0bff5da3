use thiserror::Error;

pub const DEFAULT_VIEW_SECS: u32 = 30;
pub const DEFAULT_REBUILD_SECS: u32 = 20;

/// Rounds in one bounded exercise
pub const ROUNDS_PER_EXERCISE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    Idle,
    Viewing,
    Rebuilding,
    Reviewing,
}

impl Phase {
    /// Viewing or Rebuilding, i.e. a countdown belongs to this phase
    pub fn is_timed(&self) -> bool {
        matches!(self, Phase::Viewing | Phase::Rebuilding)
    }
}

/// Which entry point started the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Bounded,
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("{field} time must be a positive number of seconds, got {value}")]
    NonPositive { field: &'static str, value: i64 },
}

/// Validated phase durations in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    view_secs: u32,
    rebuild_secs: u32,
}

impl Durations {
    pub fn new(view_secs: i64, rebuild_secs: i64) -> Result<Self, DurationError> {
        Ok(Self {
            view_secs: positive("view", view_secs)?,
            rebuild_secs: positive("rebuild", rebuild_secs)?,
        })
    }

    pub fn view_secs(&self) -> u32 {
        self.view_secs
    }

    pub fn rebuild_secs(&self) -> u32 {
        self.rebuild_secs
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            view_secs: DEFAULT_VIEW_SECS,
            rebuild_secs: DEFAULT_REBUILD_SECS,
        }
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32, DurationError> {
    match u32::try_from(value) {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(DurationError::NonPositive { field, value }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub round: u32,
    pub phase: Phase,
    /// Mode of the current cycle; bounded progress is tracked separately so a
    /// repeat cycle in between leaves it alone
    pub mode: Mode,
    pub durations: Durations,
    /// A bounded round short of the last one has been reviewed
    pub next_ready: bool,
    /// The final bounded round has been reviewed
    pub completed: bool,
}

impl Session {
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            ..Self::default()
        }
    }

    /// A countdown phase is running
    pub fn is_mid_cycle(&self) -> bool {
        self.phase.is_timed()
    }

    /// The bounded exercise has reached its final review and not been
    /// restarted since
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Forget bounded progress; a new bounded round is starting
    pub fn clear_progress(&mut self) {
        self.next_ready = false;
        self.completed = false;
    }

    /// Record that the current cycle reached review. Only bounded cycles move
    /// the exercise forward.
    pub fn record_review(&mut self) {
        if self.mode != Mode::Bounded {
            return;
        }
        if self.round >= ROUNDS_PER_EXERCISE {
            self.next_ready = false;
            self.completed = true;
        } else {
            self.next_ready = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_durations() {
        let d = Durations::default();
        assert_eq!(d.view_secs(), 30);
        assert_eq!(d.rebuild_secs(), 20);
    }

    #[test]
    fn durations_accept_positive_values() {
        let d = Durations::new(5, 3).unwrap();
        assert_eq!((d.view_secs(), d.rebuild_secs()), (5, 3));
    }

    #[test]
    fn durations_reject_zero_and_negative() {
        assert_matches!(
            Durations::new(0, 3),
            Err(DurationError::NonPositive { field: "view", value: 0 })
        );
        assert_matches!(
            Durations::new(5, -1),
            Err(DurationError::NonPositive {
                field: "rebuild",
                value: -1
            })
        );
    }

    #[test]
    fn durations_reject_values_beyond_u32() {
        assert!(Durations::new(i64::from(u32::MAX) + 1, 3).is_err());
    }

    #[test]
    fn new_session_is_idle() {
        let session = Session::new(Durations::default());
        assert_eq!(session.round, 0);
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.mode, Mode::Bounded);
        assert!(!session.is_mid_cycle());
        assert!(!session.is_complete());
    }

    #[test]
    fn completion_requires_final_bounded_review() {
        let mut session = Session::new(Durations::default());
        session.round = 1;
        session.record_review();
        assert!(session.next_ready);
        assert!(!session.is_complete());

        session.round = 2;
        session.record_review();
        assert!(!session.next_ready);
        assert!(session.is_complete());

        session.clear_progress();
        assert!(!session.is_complete());
    }

    #[test]
    fn repeat_review_keeps_bounded_progress() {
        let mut session = Session::new(Durations::default());
        session.round = 1;
        session.record_review();

        session.mode = Mode::Repeat;
        session.record_review();
        assert!(session.next_ready);
        assert!(!session.is_complete());
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Viewing.to_string(), "Viewing");
        assert_eq!(Phase::Rebuilding.to_string(), "Rebuilding");
    }
}
