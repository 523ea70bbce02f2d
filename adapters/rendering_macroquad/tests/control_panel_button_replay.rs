use maze_escape_core::Difficulty;
use maze_escape_rendering_macroquad::ControlPanelInputState;

fn run_start_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = ControlPanelInputState::default();
    let mut starts = Vec::new();
    for &pressed in sequence {
        let start = state.take_start();
        starts.push(start);
        if pressed {
            state.register_start();
        }
    }

    // Flush any trailing latched press so the harness observes the final start.
    starts.push(state.take_start());
    starts
}

fn run_difficulty_sequence(sequence: &[Option<Difficulty>]) -> Vec<Option<Difficulty>> {
    let mut state = ControlPanelInputState::default();
    let mut selections = Vec::new();
    for &pressed in sequence {
        let selection = state.take_difficulty();
        selections.push(selection);
        if let Some(difficulty) = pressed {
            state.register_difficulty(difficulty);
        }
    }
    selections.push(state.take_difficulty());
    selections
}

#[test]
fn start_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_start_sequence(&button_sequence);
    let second_run = run_start_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn difficulty_button_sequence_is_deterministic() {
    let button_sequence = [
        None,
        Some(Difficulty::Hard),
        None,
        Some(Difficulty::Easy),
        None,
    ];
    let expected = vec![
        None,
        None,
        Some(Difficulty::Hard),
        None,
        Some(Difficulty::Easy),
        None,
    ];

    let first_run = run_difficulty_sequence(&button_sequence);
    let second_run = run_difficulty_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn same_frame_presses_resolve_last_write_wins() {
    let mut state = ControlPanelInputState::default();
    state.register_difficulty(Difficulty::Easy);
    state.register_difficulty(Difficulty::Expert);

    assert_eq!(state.take_difficulty(), Some(Difficulty::Expert));
    assert_eq!(state.take_difficulty(), None);
}

#[test]
fn volume_latch_applies_once() {
    let mut state = ControlPanelInputState::default();
    assert_eq!(state.take_volume(), None);

    state.register_volume(0.4);
    assert_eq!(state.take_volume(), Some(0.4));
    assert_eq!(state.take_volume(), None);
}
