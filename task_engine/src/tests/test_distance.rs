use crate::factory::FactoryType;
use crate::ordered_task::OrderedTask;
use crate::point::TaskPointKind;
use crate::settings::TaskBehaviour;
use crate::test_helper::{
    AREA_NORTH, FINISH, START, TURN, aat_task, finish_cylinder, fly, point, racing_route, racing_task, start_cylinder,
    straight_flight, turn_sector,
};
use crate::zone::ObservationZone;
use common::aircraft::AircraftState;
use common::geo::GeoPoint;
use common::glide::GlidePolar;
use common::stats::TaskStats;

const TOLERANCE: f64 = 10.0;

fn assert_bounds_ordered(stats: &TaskStats) {
    assert!(stats.distance_min > 0.0);
    assert!(
        stats.distance_min <= stats.distance_nominal + TOLERANCE,
        "min {} nominal {}",
        stats.distance_min,
        stats.distance_nominal
    );
    assert!(
        stats.distance_nominal <= stats.distance_max + TOLERANCE,
        "nominal {} max {}",
        stats.distance_nominal,
        stats.distance_max
    );
    assert!(stats.distance_max <= stats.distance_max_total + TOLERANCE);
}

#[test]
fn racing_distances_are_ordered() {
    let task = racing_task();
    assert_bounds_ordered(task.stats());
}

#[test]
fn area_distances_are_ordered() {
    let task = aat_task();
    let stats = task.stats();
    assert_bounds_ordered(stats);
    // the areas leave a lot of room in both directions
    assert!(stats.distance_max - stats.distance_min > 20_000.0);
}

#[test]
fn start_and_finish_cylinders_are_measured_from_their_edge() {
    let task = racing_task();
    let center_chain = START.distance(&TURN) + TURN.distance(&FINISH);

    assert!((center_chain - task.stats().distance_nominal - 1000.0).abs() < 1.0);

    let start = &task.points()[0];
    assert!((start.search_max().location().distance(&START) - 500.0).abs() < 1.0);
    assert!((start.search_min().location().distance(&START) - 500.0).abs() < 1.0);
    let finish = &task.points()[2];
    assert!((finish.search_min().location().distance(&FINISH) - 500.0).abs() < 1.0);
}

#[test]
fn cylinders_are_measured_from_the_center_when_configured() {
    let behaviour = TaskBehaviour {
        subtract_start_finish_cylinder_radius: false,
        ..TaskBehaviour::default()
    };
    let mut task = OrderedTask::new(behaviour);
    task.append(&start_cylinder("Start", START, 500.0));
    task.append(&turn_sector("Turn", TURN));
    task.append(&finish_cylinder("Finish", FINISH, 500.0));
    task.update_geometry();

    let center_chain = START.distance(&TURN) + TURN.distance(&FINISH);
    assert!((task.stats().distance_nominal - center_chain).abs() < 1.0);
    assert!((task.stats().distance_nominal - racing_task().stats().distance_nominal - 1000.0).abs() < 1.0);
}

#[test]
fn update_geometry_is_idempotent() {
    let mut task = aat_task();
    let before = *task.stats();
    task.update_geometry();
    assert_eq!(before, *task.stats());
}

#[test]
fn planned_distance_follows_the_area_targets() {
    let task = aat_task();
    // targets start on the area centers
    assert!((task.stats().total.planned - task.scan_distance_planned()).abs() < 1e-6);
    let centers = task
        .points()
        .windows(2)
        .map(|leg| leg[0].location().distance(leg[1].location()))
        .sum::<f64>();
    assert!((task.stats().total.planned - centers).abs() < 1.0);
}

#[test]
fn progress_along_the_first_leg() {
    let mut task = racing_task();
    let route = racing_route(&task);
    let states = straight_flight(&route[..2], 200.0, 36_000.0);

    fly(&mut task, &states[..10]);
    assert_eq!(task.active_index(), 1);
    let early = *task.stats();

    fly(&mut task, &states[9..60]);
    assert_eq!(task.active_index(), 1);
    let late = *task.stats();

    assert!(early.total.travelled > 0.0);
    assert!(late.total.travelled > early.total.travelled);
    assert!(late.total.remaining < early.total.remaining);
    assert!(late.current_leg.remaining < early.current_leg.remaining);
    assert!(late.distance_scored > early.distance_scored);
    assert!(late.distance_scored <= late.total.travelled + TOLERANCE);
}

#[test]
fn badge_tasks_have_no_scored_distance() {
    let mut task = racing_task();
    task.set_factory(FactoryType::FaiGeneral);
    task.update_geometry();
    let route = racing_route(&task);
    let states = straight_flight(&route[..2], 200.0, 36_000.0);

    fly(&mut task, &states[..20]);

    assert_eq!(task.active_index(), 1);
    assert!(task.stats().total.travelled > 0.0);
    assert_eq!(task.stats().distance_scored, 0.0);
}

#[test]
fn summary_reports_progress() {
    let mut task = racing_task();
    let route = racing_route(&task);
    let states = straight_flight(&route[..2], 200.0, 36_000.0);
    fly(&mut task, &states[..10]);

    let summary = task.summary();
    assert_eq!(summary.active, 1);
    assert_eq!(summary.points.len(), 3);
    assert!(summary.points[0].achieved);
    assert!(!summary.points[2].achieved);
    assert!(summary.p_remaining > 0.0 && summary.p_remaining <= 1.0);
    assert!((summary.points[2].p_planned - 1.0).abs() < 1e-9);
}

/// `task` after leaving the start, together with the last fix.
fn started(mut task: OrderedTask) -> (OrderedTask, AircraftState) {
    let states = straight_flight(&[START, START.destination(0.0, 2000.0)], 100.0, 36_000.0);
    fly(&mut task, &states);
    assert_eq!(task.active_index(), 1);
    (task, states[states.len() - 1])
}

fn cylinder_turn_task() -> OrderedTask {
    let mut task = OrderedTask::new(TaskBehaviour::default());
    task.append(&start_cylinder("Start", START, 500.0));
    task.append(&point(
        TaskPointKind::Intermediate,
        "Turn",
        TURN,
        ObservationZone::Cylinder { radius: 500.0 },
    ));
    task.append(&finish_cylinder("Finish", FINISH, 500.0));
    task.update_geometry();
    task
}

fn min_distance_at(task: &mut OrderedTask, last: &AircraftState, location: GeoPoint) -> (f64, AircraftState) {
    let state = AircraftState::new(location, last.time.seconds().unwrap_or_default() + 60.0, 1500.0);
    assert!(!task.update(&state, last, &GlidePolar::default()));
    (task.stats().distance_min, state)
}

#[test]
fn minimum_search_waits_for_a_significant_move() {
    let south = AREA_NORTH.destination(180.0, 20_000.0);
    let east = AREA_NORTH.destination(90.0, 20_000.0);
    let closer = AREA_NORTH.destination(90.0, 15_000.0);

    let (mut task, last) = started(aat_task());
    let (from_south, last) = min_distance_at(&mut task, &last, south);
    // same distance to the area, the search is not repeated
    let (throttled, last) = min_distance_at(&mut task, &last, east);
    assert_eq!(throttled, from_south);
    let (from_closer, _) = min_distance_at(&mut task, &last, closer);

    let (mut fresh, last) = started(aat_task());
    let (from_east, _) = min_distance_at(&mut fresh, &last, east);
    assert!((from_east - from_south).abs() > 200.0, "{from_east} {from_south}");

    let (mut fresh, last) = started(aat_task());
    let (expected, _) = min_distance_at(&mut fresh, &last, closer);
    assert!((from_closer - expected).abs() < 1.0, "{from_closer} {expected}");
}

#[test]
fn minimum_search_is_repeated_close_to_the_active_point() {
    let south = TURN.destination(180.0, 1800.0);
    let east = TURN.destination(90.0, 1750.0);

    let (mut task, last) = started(cylinder_turn_task());
    let (from_south, last) = min_distance_at(&mut task, &last, south);
    let (from_east, _) = min_distance_at(&mut task, &last, east);

    let (mut fresh, last) = started(cylinder_turn_task());
    let (expected, _) = min_distance_at(&mut fresh, &last, east);
    assert!((from_east - expected).abs() < 1.0, "{from_east} {expected}");
    assert!((from_east - from_south).abs() > 50.0, "{from_east} {from_south}");
}
