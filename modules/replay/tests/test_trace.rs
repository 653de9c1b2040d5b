use replay::{ReplayError, read_trace, read_trace_from};
use std::path::Path;

#[test]
fn read_trace_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/short_trace.csv");
    let states = read_trace(&path).expect("trace is readable");

    assert_eq!(states.len(), 4);
    assert_eq!(states[0].time.seconds(), Some(36_000.0));
    assert_eq!(states[3].time.seconds(), Some(36_030.0));
    assert_eq!(states[1].altitude, 1490.0);
    assert!(states[..3].iter().all(|s| s.flying));
    assert!(!states[3].flying);
}

#[test]
fn missing_speed_and_track_are_derived() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/short_trace.csv");
    let states = read_trace(&path).expect("trace is readable");

    assert_eq!(states[0].ground_speed, 0.0);
    assert!((states[1].ground_speed - 11.12).abs() < 0.05);
    assert!(states[1].track.abs() < 0.1 || (states[1].track - 360.0).abs() < 0.1);
    assert_eq!(states[2].ground_speed, 25.0);
    // standing still keeps the last track
    assert_eq!(states[3].track, states[2].track);
}

#[test]
fn minimal_columns_are_enough() {
    let trace = "time,latitude,longitude,altitude\n12:30:00,47.5,11.25,900\n";
    let states = read_trace_from(trace.as_bytes()).expect("trace is readable");
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].time.seconds(), Some(45_000.0));
    assert!(states[0].flying);
}

#[test]
fn invalid_location_is_reported() {
    let trace = "time,latitude,longitude,altitude\n12:30:00,47.5,11.25,900\n12:30:01,97.5,11.25,900\n";
    assert!(matches!(
        read_trace_from(trace.as_bytes()),
        Err(ReplayError::InvalidFix { index: 1 })
    ));
}

#[test]
fn time_must_not_go_back() {
    let trace = "time,latitude,longitude,altitude\n12:30:00,47.5,11.25,900\n12:29:59,47.5,11.25,900\n";
    assert!(matches!(
        read_trace_from(trace.as_bytes()),
        Err(ReplayError::TimeGoesBack { index: 1 })
    ));
}

#[test]
fn malformed_lines_are_reported() {
    let trace = "time,latitude,longitude,altitude\nnoon,47.5,11.25,900\n";
    assert!(matches!(read_trace_from(trace.as_bytes()), Err(ReplayError::Csv(_))));
    assert!(matches!(
        read_trace(Path::new("/nonexistent/trace.csv")),
        Err(ReplayError::Csv(_))
    ));
}
