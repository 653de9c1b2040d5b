use crate::advance::{AdvanceMode, TaskAdvance};
use crate::settings::StartConstraints;
use crate::test_helper::{area, finish_cylinder, start_cylinder, turn_sector};
use common::aircraft::AircraftState;
use common::geo::GeoPoint;

const CENTER: GeoPoint = GeoPoint {
    latitude: 52.0,
    longitude: 10.0,
};

fn state(distance: f64, time: f64) -> AircraftState {
    AircraftState::new(CENTER.destination(0.0, distance), time, 1000.0)
}

#[test]
fn auto_advances_on_start_exit() {
    let mut advance = TaskAdvance::new(AdvanceMode::Auto);
    let start = start_cylinder("Start", CENTER, 500.0);

    assert!(!advance.check_ready_to_advance(&start, &state(100.0, 1.0), false));
    assert!(advance.check_ready_to_advance(&start, &state(600.0, 2.0), true));
}

#[test]
fn manual_never_advances() {
    let mut advance = TaskAdvance::new(AdvanceMode::Manual);
    let start = start_cylinder("Start", CENTER, 500.0);

    assert!(!advance.check_ready_to_advance(&start, &state(600.0, 2.0), true));
    assert!(!advance.need_to_arm());
}

#[test]
fn arm_start_requests_arming_first() {
    let mut advance = TaskAdvance::new(AdvanceMode::ArmStart);
    let start = start_cylinder("Start", CENTER, 500.0);

    assert!(!advance.check_ready_to_advance(&start, &state(600.0, 2.0), true));
    assert!(advance.need_to_arm());

    advance.set_armed(true);
    assert!(!advance.need_to_arm());
    assert!(advance.check_ready_to_advance(&start, &state(600.0, 2.0), true));
}

#[test]
fn arm_start_advances_turn_points_automatically() {
    let mut advance = TaskAdvance::new(AdvanceMode::ArmStart);
    let mut turn = turn_sector("Turn", CENTER);
    turn.set_neighbours(Some((0, GeoPoint::new(51.9, 10.0))), None);

    assert!(!advance.check_ready_to_advance(&turn, &state(100.0, 1.0), false));

    let inside = AircraftState::new(CENTER.destination(turn.axis(), 1000.0), 3.0, 1000.0);
    let outside = AircraftState::new(CENTER.destination(turn.axis(), 5000.0), 2.0, 1000.0);
    assert!(turn.transition_enter(&inside, &outside, true));
    assert!(advance.check_ready_to_advance(&turn, &inside, false));
}

#[test]
fn arm_all_requires_arming_for_turn_points() {
    let mut advance = TaskAdvance::new(AdvanceMode::ArmAll);
    let mut turn = area("Area", CENTER, 5000.0);
    turn.transition_enter(&state(1000.0, 2.0), &state(6000.0, 1.0), true);

    assert!(!advance.check_ready_to_advance(&turn, &state(6000.0, 3.0), true));
    assert!(advance.need_to_arm());
    assert!(advance.toggle_armed());
    assert!(advance.check_ready_to_advance(&turn, &state(6000.0, 3.0), true));
}

#[test]
fn area_point_waits_for_exit_or_target() {
    let mut advance = TaskAdvance::new(AdvanceMode::Auto);
    let mut turn = area("Area", CENTER, 10_000.0);
    turn.transition_enter(&state(9000.0, 2.0), &state(11_000.0, 1.0), true);

    assert!(!advance.check_ready_to_advance(&turn, &state(5000.0, 3.0), false));
    assert!(advance.check_ready_to_advance(&turn, &state(500.0, 4.0), false));
    assert!(advance.check_ready_to_advance(&turn, &state(11_000.0, 5.0), true));
}

#[test]
fn finish_is_never_ready() {
    let mut advance = TaskAdvance::new(AdvanceMode::Auto);
    let mut finish = finish_cylinder("Finish", CENTER, 500.0);
    finish.transition_enter(&state(100.0, 2.0), &state(1000.0, 1.0), true);
    finish.transition_exit(&state(1000.0, 3.0), &state(100.0, 2.0), &StartConstraints::default(), false);

    assert!(!advance.check_ready_to_advance(&finish, &state(1000.0, 3.0), true));
}

#[test]
fn reset_disarms() {
    let mut advance = TaskAdvance::new(AdvanceMode::ArmAll);
    advance.set_armed(true);
    advance.reset();
    assert!(!advance.is_armed());
    assert!(!advance.need_to_arm());
    assert_eq!(advance.mode(), AdvanceMode::ArmAll);
}
