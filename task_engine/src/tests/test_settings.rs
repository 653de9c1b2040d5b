use crate::factory::FactoryType;
use crate::settings::{
    DistanceSignificance, FinishConstraints, OrderedTaskSettings, StartConstraints, TaskBehaviour, TimeWindow,
};
use chrono::{Duration, NaiveTime};
use common::aircraft::{AircraftState, TimeStamp};
use common::geo::GeoPoint;

fn at(h: u32, m: u32) -> TimeStamp {
    TimeStamp::from_seconds(f64::from(h * 3600 + m * 60))
}

fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

#[test]
fn unbounded_window_is_always_open() {
    let window = TimeWindow::unbounded();
    assert!(window.is_inside(at(0, 0)));
    assert!(window.is_inside(at(23, 59)));
    assert!(window.has_begun(TimeStamp::undefined()));
    assert!(!window.has_ended(TimeStamp::undefined()));
}

#[test]
fn bounded_window() {
    let window = TimeWindow::new(time(12, 0), time(13, 0));
    assert!(!window.has_begun(at(11, 59)));
    assert!(window.is_inside(at(12, 0)));
    assert!(window.is_inside(at(13, 0)));
    assert!(window.has_ended(at(13, 1)));
    assert!(!window.is_inside(at(13, 1)));
    assert!(!window.has_begun(TimeStamp::undefined()));
}

#[test]
fn start_speed_and_height_limits() {
    let constraints = StartConstraints {
        max_speed: Some(40.0),
        max_height: Some(1000.0),
        ..StartConstraints::default()
    };
    let mut state = AircraftState::new(GeoPoint::new(52.0, 10.0), 0.0, 900.0);
    state.ground_speed = 35.0;
    assert!(constraints.check_speed(&state));
    assert!(constraints.check_height(&state));

    state.ground_speed = 45.0;
    state.altitude = 1100.0;
    assert!(!constraints.check_speed(&state));
    assert!(!constraints.check_height(&state));

    assert!(StartConstraints::default().check_speed(&state));
}

#[test]
fn finish_height_rules() {
    let plain = FinishConstraints {
        min_height: 500.0,
        ..FinishConstraints::default()
    };
    assert_eq!(plain.finish_height(None), 500.0);
    assert_eq!(plain.finish_height(Some(2000.0)), 500.0);

    let fai = FinishConstraints {
        min_height: 500.0,
        fai_finish: true,
        max_height_loss: None,
    };
    assert_eq!(fai.finish_height(None), 500.0);
    assert_eq!(fai.finish_height(Some(2000.0)), 1000.0);
    assert_eq!(fai.finish_height(Some(1200.0)), 500.0);

    let limited = FinishConstraints {
        max_height_loss: Some(800.0),
        ..fai
    };
    assert_eq!(limited.finish_height(Some(2000.0)), 1200.0);
}

#[test]
fn significance_of_position_changes() {
    let significance = DistanceSignificance::default();
    assert!(significance.is_significant(1500.0, 1400.0));
    assert!(!significance.is_significant(10_000.0, 9800.0));
    assert!(significance.is_significant(10_000.0, 9000.0));
    assert!(significance.is_significant(9000.0, 10_000.0));
}

#[test]
fn settings_defaults() {
    let behaviour = TaskBehaviour::default();
    assert!(behaviour.subtract_start_finish_cylinder_radius);
    assert_eq!(behaviour.task_type_default, FactoryType::Racing);
    assert_eq!(behaviour.glide.safety_height_arrival, 300.0);
    assert_eq!(behaviour.ordered_defaults.aat_min_time, Duration::hours(3));
    assert_eq!(behaviour.ordered_defaults.aat_min_time_seconds(), 10_800.0);
}

#[test]
fn task_settings_from_partial_json() {
    let json = r#"{
        "aat_min_time": "02:30:00",
        "start_constraints": {
            "open_time_span": { "start": "12:00", "end": null },
            "max_speed": 41.7,
            "pev_start_wait_time": "00:05:00",
            "pev_start_window": "00:10:00"
        }
    }"#;
    let settings: OrderedTaskSettings = serde_json::from_str(json).expect("valid settings");

    assert_eq!(settings.aat_min_time, Duration::minutes(150));
    assert_eq!(settings.start_constraints.open_time_span, TimeWindow::new(time(12, 0), None));
    assert_eq!(settings.start_constraints.max_speed, Some(41.7));
    assert_eq!(settings.start_constraints.pev_start_wait_time, Duration::minutes(5));
    assert_eq!(settings.finish_constraints, FinishConstraints::default());
}

#[test]
fn behaviour_serializes_and_reads_back() {
    let behaviour = TaskBehaviour {
        optimise_targets_margin: Duration::minutes(10),
        task_type_default: FactoryType::Aat,
        ..TaskBehaviour::default()
    };
    let json = serde_json::to_string(&behaviour).expect("serializable");
    let read: TaskBehaviour = serde_json::from_str(&json).expect("valid behaviour");
    assert_eq!(read, behaviour);
}
