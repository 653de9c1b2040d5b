use crate::declaration::{DeclarationError, TaskDeclaration};
use crate::factory::FactoryType;
use crate::point::TaskPointKind;
use crate::settings::TaskBehaviour;
use crate::test_helper::{aat_task, racing_task};
use crate::waypoint::{WaypointStore, Waypoints};
use crate::zone::ObservationZone;
use std::sync::Arc;

const AAT_DECLARATION: &str = r#"{
    "name": "Tuesday",
    "type": "aat",
    "settings": { "aat_min_time": "02:00:00" },
    "points": [
        { "type": "start", "waypoint": { "name": "Home", "latitude": 52.0, "longitude": 10.0, "elevation": 80.0 },
          "zone": { "shape": "line", "length": 2000.0 } },
        { "type": "aat", "waypoint": { "name": "North", "latitude": 52.3, "longitude": 10.0 },
          "zone": { "shape": "cylinder", "radius": 20000.0 } },
        { "type": "aat", "waypoint": { "name": "East", "latitude": 52.15, "longitude": 10.5 } },
        { "type": "finish", "waypoint": { "name": "Home", "latitude": 52.0, "longitude": 10.0, "elevation": 80.0 } }
    ]
}"#;

#[test_log::test]
fn build_area_task_from_json() {
    let declaration = TaskDeclaration::from_json(AAT_DECLARATION).expect("valid declaration");
    let mut store = Waypoints::new();
    let task = declaration
        .build(TaskBehaviour::default(), &mut store)
        .expect("task is built");

    assert_eq!(task.name(), "Tuesday");
    assert_eq!(task.factory_type(), FactoryType::Aat);
    assert_eq!(task.task_size(), 4);
    assert!(task.check_task().is_empty());
    assert_eq!(task.ordered_task_settings().aat_min_time_seconds(), 7200.0);

    assert_eq!(task.points()[0].zone(), &ObservationZone::Line { length: 2000.0 });
    assert_eq!(task.points()[1].zone().cylinder_radius(), Some(20_000.0));
    // missing zones fall back to the defaults of the task type
    assert_eq!(task.points()[2].zone().cylinder_radius(), Some(10_000.0));
    assert_eq!(task.points()[3].zone(), &ObservationZone::Cylinder { radius: 1000.0 });

    // start and finish share the waypoint
    assert_eq!(store.len(), 3);
    assert!(Arc::ptr_eq(task.points()[0].waypoint(), task.points()[3].waypoint()));
    assert!(store.find_by_name("North").is_some());
    assert_eq!(task.points()[0].elevation(), 80.0);
}

#[test]
fn settings_default_to_the_behaviour() {
    let json = r#"{ "points": [
        { "type": "start", "waypoint": { "name": "A", "latitude": 52.0, "longitude": 10.0 } },
        { "type": "finish", "waypoint": { "name": "B", "latitude": 52.2, "longitude": 10.0 } }
    ] }"#;
    let declaration = TaskDeclaration::from_json(json).expect("valid declaration");
    let task = declaration
        .build(TaskBehaviour::default(), &mut Waypoints::new())
        .expect("task is built");

    assert_eq!(task.factory_type(), FactoryType::Racing);
    assert_eq!(task.ordered_task_settings(), &TaskBehaviour::default().ordered_defaults);
    assert!(task.name().is_empty());
}

#[test]
fn point_after_finish_is_rejected() {
    let json = r#"{ "points": [
        { "type": "start", "waypoint": { "name": "A", "latitude": 52.0, "longitude": 10.0 } },
        { "type": "finish", "waypoint": { "name": "B", "latitude": 52.2, "longitude": 10.0 } },
        { "type": "intermediate", "waypoint": { "name": "C", "latitude": 52.1, "longitude": 10.1 } }
    ] }"#;
    let declaration = TaskDeclaration::from_json(json).expect("valid declaration");
    let result = declaration.build(TaskBehaviour::default(), &mut Waypoints::new());

    assert!(matches!(
        result,
        Err(DeclarationError::Rejected {
            index: 2,
            kind: TaskPointKind::Intermediate
        })
    ));
}

#[test]
fn invalid_location_is_rejected() {
    let json = r#"{ "points": [
        { "type": "start", "waypoint": { "name": "Nowhere", "latitude": 95.0, "longitude": 10.0 } }
    ] }"#;
    let declaration = TaskDeclaration::from_json(json).expect("valid declaration");
    let result = declaration.build(TaskBehaviour::default(), &mut Waypoints::new());
    assert!(matches!(result, Err(DeclarationError::InvalidLocation(name)) if name == "Nowhere"));
}

#[test]
fn optional_starts_must_be_starts() {
    let mut declaration = TaskDeclaration::from_task(&racing_task());
    let mut optional = declaration.points[1].clone();
    optional.kind = TaskPointKind::Intermediate;
    declaration.optional_starts.push(optional);

    let result = declaration.build(TaskBehaviour::default(), &mut Waypoints::new());
    assert!(matches!(result, Err(DeclarationError::InvalidOptionalStart(0))));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(
        TaskDeclaration::from_json(r#"{ "points": [ { "type": "nowhere" } ] }"#),
        Err(DeclarationError::Json(_))
    ));
}

#[test]
fn declaration_describes_the_task_structure() {
    let task = aat_task();
    let json = TaskDeclaration::from_task(&task).to_json().expect("serializable");

    let declaration = TaskDeclaration::from_json(&json).expect("valid declaration");
    let rebuilt = declaration
        .build(TaskBehaviour::default(), &mut Waypoints::new())
        .expect("task is built");

    assert_eq!(rebuilt.name(), task.name());
    assert_eq!(rebuilt.factory_type(), task.factory_type());
    assert_eq!(rebuilt.task_size(), task.task_size());
    for (a, b) in rebuilt.points().iter().zip(task.points()) {
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.zone(), b.zone());
        assert_eq!(a.name(), b.name());
        assert_eq!(a.location(), b.location());
    }
}

#[test]
fn load_reports_missing_files() {
    let result = TaskDeclaration::load(std::path::Path::new("/nonexistent/task.json"));
    assert!(matches!(result, Err(DeclarationError::Io(_))));
}
