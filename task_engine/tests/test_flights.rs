use common::glide::GlidePolar;
use std::path::Path;
use task_engine::declaration::TaskDeclaration;
use task_engine::test_helper::{RecordedEvent, RecordingTaskEvents, aat_task, racing_route, straight_flight};
use task_engine::{TaskBehaviour, Waypoints};
mod util;
use util::flights::*;

fn polar() -> GlidePolar {
    GlidePolar::default().with_mc(1.5)
}

#[test_log::test]
fn racing_task_from_declaration_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/racing.json");
    let declaration = TaskDeclaration::load(&path).expect("declaration is readable");
    let mut task = declaration
        .build(TaskBehaviour::default(), &mut Waypoints::new())
        .expect("task is built");
    assert!(task.check_task().is_empty());

    let events = RecordingTaskEvents::new();
    task.set_task_events(events.clone());

    let states = straight_flight(&racing_route(&task), 250.0, 36_000.0);
    let recorded = fly_recording(&mut task, &states, &polar(), true);

    assert!(task.stats().task_finished);
    assert_eq!(events.count(&RecordedEvent::Start), 1);
    assert_eq!(events.count(&RecordedEvent::Finish), 1);
    assert_eq!(task.points()[2].min_altitude(), 300.0);

    for pair in recorded.windows(2) {
        assert!(pair[1].active_index >= pair[0].active_index);
    }
    let finished = recorded
        .iter()
        .position(|s| s.task_finished)
        .expect("finish is recorded");
    assert!(recorded[..finished].iter().all(|s| !s.task_finished));
    assert!(recorded[finished].total.time_elapsed > 0.0);
    assert!(recorded[finished].distance_scored > 0.8 * recorded[finished].distance_nominal);
}

#[test_log::test]
fn area_task_through_the_centers() {
    let mut task = aat_task();
    let events = RecordingTaskEvents::new();
    task.set_task_events(events.clone());

    let states = straight_flight(&center_route(&task), 500.0, 36_000.0);
    let recorded = fly_recording(&mut task, &states, &polar(), false);

    assert_eq!(
        events
            .events()
            .into_iter()
            .filter(|e| matches!(e, RecordedEvent::Advanced(..)))
            .collect::<Vec<_>>(),
        vec![
            RecordedEvent::Advanced("North".to_string(), 1),
            RecordedEvent::Advanced("East".to_string(), 2),
            RecordedEvent::Advanced("Finish".to_string(), 3),
        ]
    );
    assert_eq!(events.count(&RecordedEvent::Finish), 1);
    assert_eq!(task.active_index(), 3);
    assert!(task.points()[1].has_sampled());
    assert!(task.points()[2].has_sampled());

    for (fix, stats) in recorded.iter().enumerate() {
        assert!(
            stats.distance_min <= stats.distance_max + 1.0,
            "fix {}: min {:.0} exceeds max {:.0}",
            fix,
            stats.distance_min,
            stats.distance_max
        );
    }

    let last = recorded.last().expect("fixes were flown");
    assert!(last.task_finished);
    // Only the finish is left, both searches end on the same path.
    assert!((last.distance_min - last.distance_max).abs() < 1.0);
    assert!(last.distance_max <= last.distance_max_total + 1.0);
    assert!(last.total.travelled > 0.0);
}

#[test_log::test]
fn area_targets_move_while_flying() {
    let mut task = aat_task();
    let planned_before = task.stats().total.planned;

    let states = straight_flight(&center_route(&task), 500.0, 36_000.0);
    let recorded = fly_recording(&mut task, &states, &polar(), true);

    // three hours leave room to fly the areas out
    assert!(recorded[1].total.planned > planned_before + 1000.0);
    assert!(task.stats().task_finished);
    assert_eq!(task.active_index(), 3);
}
