use noise_identification_core::{
    ButtonId, Category, Command, Event, Host, ModuleId, PressOutcome, Stage, StageAssignment,
    INTERACTION_PULSE_STRENGTH,
};
use noise_identification_module::{
    self as module, apply, deliver, press, press_button, query, NoiseModule,
};

#[derive(Debug, Default)]
struct RecordingHost {
    strikes: usize,
    passes: usize,
    sounds: Vec<ButtonId>,
    pulses: Vec<f32>,
}

impl Host for RecordingHost {
    fn signal_strike(&mut self) {
        self.strikes += 1;
    }

    fn signal_pass(&mut self) {
        self.passes += 1;
    }

    fn play_confirmation_sound(&mut self, button: ButtonId) {
        self.sounds.push(button);
    }

    fn pulse(&mut self, strength: f32) {
        self.pulses.push(strength);
    }
}

const SCENARIO: StageAssignment =
    StageAssignment::new(Category::Crystal, Category::Liquid, Category::White);

fn fresh_module(assignment: StageAssignment) -> NoiseModule {
    let mut events = Vec::new();
    NoiseModule::with_assignment(ModuleId::new(1), assignment, &mut events)
}

fn button(category: Category) -> ButtonId {
    ButtonId::for_category(category)
}

#[test]
fn correct_press_advances_to_stage_two() {
    let mut module = fresh_module(SCENARIO);
    let mut events = Vec::new();

    let outcome = press_button(&mut module, button(Category::Crystal), &mut events);

    assert_eq!(outcome, PressOutcome::Correct);
    assert_eq!(query::status(&module).stage_number, 2);
    assert_eq!(query::expected(&module), Some(Category::Liquid));
    assert_eq!(
        events,
        vec![
            Event::ButtonPressed {
                button: button(Category::Crystal),
            },
            Event::StageLedLit {
                stage: Stage::First,
            },
            Event::StageAdvanced {
                stage: Stage::Second,
                expected: Category::Liquid,
            },
            Event::DisplayRevealRequested {
                category: Category::Liquid,
            },
        ],
    );
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::StrikeSignalled { .. })),
        "correct press must not strike",
    );
}

#[test]
fn incorrect_press_strikes_once_without_progress() {
    for stage_number in 1..=3 {
        let mut module = NoiseModule::resume(ModuleId::new(4), SCENARIO, stage_number);
        let expected = query::expected(&module).expect("module is unsolved");
        let wrong = Category::ALL
            .into_iter()
            .find(|category| *category != expected)
            .expect("another category exists");
        let mut host = RecordingHost::default();

        let outcome = press(&mut module, button(wrong), &mut host);

        assert_eq!(outcome, PressOutcome::Incorrect);
        assert_eq!(host.strikes, 1, "stage {stage_number} should strike once");
        assert_eq!(host.passes, 0);
        assert_eq!(query::status(&module).stage_number, stage_number);
        assert_eq!(query::expected(&module), Some(expected));
    }
}

#[test]
fn every_judged_press_pulses_and_plays_a_sound() {
    let mut module = fresh_module(SCENARIO);
    let mut host = RecordingHost::default();

    let _ = press(&mut module, button(Category::Voronoi), &mut host);
    let _ = press(&mut module, button(Category::Crystal), &mut host);

    assert_eq!(
        host.sounds,
        vec![button(Category::Voronoi), button(Category::Crystal)]
    );
    assert_eq!(
        host.pulses,
        vec![INTERACTION_PULSE_STRENGTH, INTERACTION_PULSE_STRENGTH]
    );
}

#[test]
fn scripted_scenario_solves_with_a_single_pass() {
    let mut module = fresh_module(SCENARIO);
    let mut host = RecordingHost::default();

    assert_eq!(
        press(&mut module, button(Category::Crystal), &mut host),
        PressOutcome::Correct
    );
    assert_eq!(query::status(&module).stage_number, 2);
    assert_eq!(query::expected(&module), Some(Category::Liquid));

    assert_eq!(
        press(&mut module, button(Category::Moisture), &mut host),
        PressOutcome::Incorrect
    );
    assert_eq!(host.strikes, 1);
    assert_eq!(query::expected(&module), Some(Category::Liquid));

    assert_eq!(
        press(&mut module, button(Category::Liquid), &mut host),
        PressOutcome::Correct
    );
    assert_eq!(query::status(&module).stage_number, 3);
    assert_eq!(query::expected(&module), Some(Category::White));

    assert_eq!(
        press(&mut module, button(Category::White), &mut host),
        PressOutcome::Correct
    );
    let status = query::status(&module);
    assert!(status.solved);
    assert_eq!(status.stage_number, 4);
    assert_eq!(host.passes, 1);
    assert_eq!(host.strikes, 1);
}

#[test]
fn final_press_lights_last_led_and_collapses_display() {
    let mut module = NoiseModule::resume(ModuleId::new(2), SCENARIO, 3);
    let mut events = Vec::new();

    let _ = press_button(&mut module, button(Category::White), &mut events);

    assert_eq!(
        events,
        vec![
            Event::ButtonPressed {
                button: button(Category::White),
            },
            Event::StageLedLit {
                stage: Stage::Third,
            },
            Event::DisplayCollapsed,
            Event::PassSignalled,
        ],
    );
}

#[test]
fn solved_module_ignores_every_button() {
    let mut module = fresh_module(SCENARIO);
    let mut host = RecordingHost::default();
    for category in [Category::Crystal, Category::Liquid, Category::White] {
        let _ = press(&mut module, button(category), &mut host);
    }
    assert!(query::is_solved(&module));
    assert_eq!(host.passes, 1);

    for _ in 0..3 {
        for category in Category::ALL {
            let mut events = Vec::new();
            let outcome = press_button(&mut module, button(category), &mut events);
            assert_eq!(outcome, PressOutcome::Ignored);
            assert!(events.is_empty(), "solved module emitted {events:?}");
            assert_eq!(
                press(&mut module, button(category), &mut host),
                PressOutcome::Ignored
            );
        }
    }

    assert_eq!(host.passes, 1, "pass must be signalled exactly once");
    assert_eq!(host.strikes, 0);
    assert_eq!(host.sounds.len(), 3, "ignored presses stay silent");
    assert_eq!(query::expected(&module), None);
}

#[test]
fn unknown_button_is_ignored() {
    let mut module = fresh_module(SCENARIO);
    let mut events = Vec::new();

    let outcome = press_button(&mut module, ButtonId::new(42), &mut events);

    assert_eq!(outcome, PressOutcome::Ignored);
    assert!(events.is_empty());
    assert_eq!(query::status(&module).stage_number, 1);
}

#[test]
fn impossible_counter_forces_a_solve() {
    let mut module = NoiseModule::resume(ModuleId::new(9), SCENARIO, 7);
    let expected = query::expected(&module).expect("module is unsolved");
    let mut events = Vec::new();

    let outcome = press_button(&mut module, button(expected), &mut events);

    assert_eq!(outcome, PressOutcome::Correct);
    assert!(query::is_solved(&module));
    assert_eq!(
        events,
        vec![
            Event::ButtonPressed {
                button: button(expected),
            },
            Event::StageLedLit {
                stage: Stage::First,
            },
            Event::StageLedLit {
                stage: Stage::Second,
            },
            Event::StageLedLit {
                stage: Stage::Third,
            },
            Event::FaultRecovered { stage_number: 8 },
            Event::DisplayCollapsed,
            Event::PassSignalled,
        ],
    );

    let mut host = RecordingHost::default();
    deliver(&events, &mut host);
    assert_eq!(host.passes, 1);

    assert_eq!(
        press(&mut module, button(expected), &mut host),
        PressOutcome::Ignored
    );
    assert_eq!(host.passes, 1);
}

#[test]
fn apply_routes_presses_through_the_dispatcher() {
    let mut module = fresh_module(SCENARIO);
    let mut events = Vec::new();

    module::apply(
        &mut module,
        Command::PressButton {
            button: button(Category::Crystal),
        },
        &mut events,
    );
    apply(
        &mut module,
        Command::PressButton {
            button: button(Category::Crystal),
        },
        &mut events,
    );

    assert_eq!(query::status(&module).stage_number, 2);
    assert!(events.contains(&Event::StrikeSignalled {
        expected: Category::Liquid,
        received: Category::Crystal,
    }));
}

#[test]
fn resumed_solved_module_is_terminal() {
    let mut module = NoiseModule::resume(ModuleId::new(5), SCENARIO, 4);
    let mut host = RecordingHost::default();

    assert_eq!(
        press(&mut module, button(Category::White), &mut host),
        PressOutcome::Ignored
    );
    assert_eq!(host.passes, 0);
    assert_eq!(host.strikes, 0);
}
