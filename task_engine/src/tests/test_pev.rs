use crate::ordered_task::OrderedTask;
use crate::settings::{OrderedTaskSettings, StartConstraints, TaskBehaviour, TimeWindow};
use crate::test_helper::{
    FINISH, START, TURN, finish_cylinder, fly, racing_route, racing_task, straight_flight, turn_sector,
};
use chrono::{Duration, NaiveTime};
use common::aircraft::AircraftState;

fn time(h: u32, m: u32, s: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, s)
}

fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    time(h, m, s).expect("valid time")
}

fn fix(seconds: f64) -> AircraftState {
    let mut state = AircraftState::new(START, seconds, 1500.0);
    state.ground_speed = 30.0;
    state
}

fn with_start_constraints(constraints: StartConstraints) -> crate::OrderedTask {
    let mut task = racing_task();
    task.set_ordered_task_settings(OrderedTaskSettings {
        start_constraints: constraints,
        ..OrderedTaskSettings::default()
    });
    task
}

#[test]
fn pilot_event_before_first_fix_is_ignored() {
    let mut task = racing_task();
    assert!(!task.set_pev(hms(10, 0, 0)));
    assert!(!task.pev_received());
}

#[test_log::test]
fn pilot_event_opens_the_start_window() {
    let mut task = with_start_constraints(StartConstraints {
        pev_start_wait_time: Duration::minutes(5),
        pev_start_window: Duration::minutes(10),
        ..StartConstraints::default()
    });

    fly(&mut task, &[fix(36_000.0)]);
    assert!(task.set_pev(hms(10, 0, 30)));
    assert!(task.pev_received());

    fly(&mut task, &[fix(36_010.0)]);
    assert!(!task.pev_received());
    assert_eq!(
        task.ordered_task_settings().start_constraints.open_time_span,
        TimeWindow::new(time(10, 6, 0), time(10, 16, 0))
    );
    assert!(!task.stats().pev_based_advance_ready);
}

#[test_log::test]
fn pilot_event_on_the_full_minute_is_not_rounded_up() {
    let mut task = with_start_constraints(StartConstraints {
        pev_start_wait_time: Duration::minutes(5),
        ..StartConstraints::default()
    });

    fly(&mut task, &[fix(36_000.0)]);
    task.set_pev(hms(10, 0, 0));
    fly(&mut task, &[fix(36_010.0)]);

    assert_eq!(
        task.ordered_task_settings().start_constraints.open_time_span,
        TimeWindow::new(time(10, 5, 0), None)
    );
}

#[test]
fn scored_pilot_event_requires_an_open_gate() {
    let mut task = with_start_constraints(StartConstraints {
        score_pev: true,
        open_time_span: TimeWindow::new(time(12, 0, 0), None),
        ..StartConstraints::default()
    });

    fly(&mut task, &[fix(36_000.0)]);
    assert!(!task.set_pev(hms(12, 30, 0)));
    assert!(!task.pev_received());
}

#[test]
fn task_without_start_has_no_gate_to_check() {
    let mut task = OrderedTask::new(TaskBehaviour::default());
    task.append(&turn_sector("Turn", TURN));
    task.append(&finish_cylinder("Finish", FINISH, 500.0));
    task.set_ordered_task_settings(OrderedTaskSettings {
        start_constraints: StartConstraints {
            score_pev: true,
            open_time_span: TimeWindow::new(time(12, 0, 0), None),
            ..StartConstraints::default()
        },
        ..OrderedTaskSettings::default()
    });
    assert!(!task.has_start());

    fly(&mut task, &[fix(36_000.0)]);
    assert!(task.set_pev(hms(10, 0, 30)));
    assert!(task.pev_received());
}

#[test]
fn gate_is_checked_at_the_last_fix() {
    let mut task = with_start_constraints(StartConstraints {
        score_pev: true,
        open_time_span: TimeWindow::new(time(10, 0, 5), None),
        ..StartConstraints::default()
    });

    fly(&mut task, &[fix(36_000.0)]);
    // pressed after the gate opened, but the last fix is before it
    assert!(!task.set_pev(hms(10, 0, 10)));

    fly(&mut task, &[fix(36_006.0)]);
    assert!(task.set_pev(hms(10, 0, 10)));
}

#[test_log::test]
fn scored_pilot_event_releases_the_start() {
    let mut task = with_start_constraints(StartConstraints {
        score_pev: true,
        max_speed: Some(10.0),
        ..StartConstraints::default()
    });
    let route = racing_route(&task);
    let states = straight_flight(&route[..2], 200.0, 36_000.0);

    fly(&mut task, &states[..1]);
    assert!(task.set_pev(hms(10, 0, 0)));
    fly(&mut task, &states[..1]);
    assert!(task.stats().pev_based_advance_ready);
    assert_eq!(
        task.ordered_task_settings().start_constraints.open_time_span,
        TimeWindow::new(time(10, 0, 0), None)
    );

    fly(&mut task, &states[..10]);

    assert!(task.task_started());
    assert_eq!(task.active_index(), 1);
    assert!(task.stats().start.advanced_by_pev);
    assert!(!task.stats().pev_based_advance_ready);
}

#[test]
fn too_fast_start_without_pilot_event_is_not_scored() {
    let mut task = with_start_constraints(StartConstraints {
        max_speed: Some(10.0),
        ..StartConstraints::default()
    });
    let route = racing_route(&task);
    let states = straight_flight(&route[..2], 200.0, 36_000.0);

    fly(&mut task, &states[..10]);

    assert!(!task.task_started());
    assert_eq!(task.active_index(), 0);
    assert!(!task.stats().start.has_started());
}
