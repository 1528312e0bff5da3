use assert_matches::assert_matches;
use glimpse::exercise::{ExerciseController, ExerciseError, TimerFrame};
use glimpse::image::SequentialSource;
use glimpse::session::{Durations, Phase};

fn controller() -> ExerciseController {
    ExerciseController::new(
        Durations::default(),
        Box::new(SequentialSource::starting_at(100)),
    )
}

fn finish_cycle(c: &mut ExerciseController) -> usize {
    let mut ticks = 0;
    while c.countdown_active() {
        c.tick();
        ticks += 1;
    }
    ticks
}

#[test]
fn set_durations_then_start_yields_documented_sequence() {
    let mut c = controller();
    c.set_durations(5, 3).unwrap();
    c.start_sequence();

    let mut seen = vec![c.timer_frame().unwrap()];
    while c.countdown_active() {
        let step = c.tick();
        seen.extend(step.frame);
        if step.entered.is_some() {
            seen.extend(c.timer_frame());
        }
    }

    let phases_and_values: Vec<(Phase, u32)> = seen
        .iter()
        .map(|TimerFrame { phase, remaining }| (*phase, *remaining))
        .collect();
    assert_eq!(
        phases_and_values,
        vec![
            (Phase::Viewing, 5),
            (Phase::Viewing, 4),
            (Phase::Viewing, 3),
            (Phase::Viewing, 2),
            (Phase::Viewing, 1),
            (Phase::Viewing, 0),
            (Phase::Rebuilding, 3),
            (Phase::Rebuilding, 2),
            (Phase::Rebuilding, 1),
            (Phase::Rebuilding, 0),
        ]
    );
    assert_eq!(c.phase(), Phase::Reviewing);
}

#[test]
fn bounded_exercise_needs_explicit_restart_after_two_rounds() {
    let mut c = controller();
    c.set_durations(2, 2).unwrap();

    c.start_sequence();
    assert_eq!(finish_cycle(&mut c), 4);
    c.advance_round().unwrap();
    assert_eq!(finish_cycle(&mut c), 4);

    assert!(c.is_complete());
    assert_matches!(c.advance_round(), Err(ExerciseError::SequenceComplete));

    c.start_sequence();
    assert_eq!(c.round(), 1);
    assert!(!c.is_complete());
}

#[test]
fn each_cycle_sources_a_new_image() {
    let mut c = controller();
    c.set_durations(1, 1).unwrap();

    c.start_sequence();
    let first = c.image().cloned().unwrap();
    finish_cycle(&mut c);
    assert_eq!(c.image(), Some(&first), "review shows the same image");

    c.advance_round().unwrap();
    let second = c.image().cloned().unwrap();
    assert_ne!(first.seed, second.seed);
}

#[test]
fn repeat_affordance_tracks_mid_cycle_over_many_cycles() {
    let mut c = controller();
    c.set_durations(3, 2).unwrap();
    c.set_fullscreen(true);

    for _ in 0..4 {
        c.start_repeat_cycle().unwrap();
        while c.countdown_active() {
            assert!(!c.repeat_enabled());
            c.tick();
        }
        assert!(c.repeat_enabled());
        assert_eq!(c.round(), 0);
    }
}

#[test]
fn leaving_focus_mid_repeat_finishes_the_cycle() {
    let mut c = controller();
    c.set_durations(1, 1).unwrap();
    c.set_fullscreen(true);
    c.start_repeat_cycle().unwrap();

    c.set_fullscreen(false);
    assert!(!c.fullscreen_timer_visible());
    finish_cycle(&mut c);

    assert_eq!(c.phase(), Phase::Reviewing);
    assert_matches!(c.start_repeat_cycle(), Err(ExerciseError::NotFullscreen));
}
