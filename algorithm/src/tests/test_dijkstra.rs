use crate::{TaskDijkstraMax, TaskDijkstraMin};
use common::flat::TaskProjection;
use common::geo::{GeoBounds, GeoPoint};
use common::search_point::SearchPoint;

fn projection() -> TaskProjection {
    TaskProjection::new(&GeoBounds::from_point(&GeoPoint::new(52.0, 11.0)))
}

/// Point at `north`/`east` meters from the projection center.
fn point(projection: &TaskProjection, north: f64, east: f64) -> SearchPoint {
    let center = GeoPoint::new(52.0, 11.0);
    SearchPoint::new(center.destination(0.0, north).destination(90.0, east), projection)
}

#[test]
fn min_path_picks_closest_points() {
    let p = projection();
    let start = vec![point(&p, 0.0, 0.0)];
    let middle = vec![point(&p, 5000.0, 10_000.0), point(&p, 0.0, 10_000.0), point(&p, -5000.0, 10_000.0)];
    let finish = vec![point(&p, 0.0, 20_000.0)];
    let layers: Vec<&[SearchPoint]> = vec![start.as_slice(), middle.as_slice(), finish.as_slice()];

    let solution = TaskDijkstraMin::new().solve(&layers, None).expect("a path");

    assert_eq!(solution.indices, vec![0, 1, 0]);
    assert!((solution.distance as f64 - 20_000.0).abs() < 5.0);
}

#[test]
fn max_path_picks_farthest_points() {
    let p = projection();
    let start = vec![point(&p, 0.0, 0.0)];
    let middle = vec![point(&p, 1000.0, 10_000.0), point(&p, 0.0, 10_000.0), point(&p, -8000.0, 10_000.0)];
    let finish = vec![point(&p, 0.0, 20_000.0)];
    let layers: Vec<&[SearchPoint]> = vec![start.as_slice(), middle.as_slice(), finish.as_slice()];

    let solution = TaskDijkstraMax::new().solve(&layers, None).expect("a path");

    assert_eq!(solution.indices, vec![0, 2, 0]);
    let min = TaskDijkstraMin::new().solve(&layers, None).expect("a path");
    assert!(solution.distance > min.distance);
}

#[test]
fn origin_is_part_of_the_path() {
    let p = projection();
    let origin = point(&p, 0.0, -3000.0);
    let first = vec![point(&p, 0.0, 0.0), point(&p, 0.0, -2000.0)];
    let second = vec![point(&p, 0.0, 10_000.0)];
    let layers: Vec<&[SearchPoint]> = vec![first.as_slice(), second.as_slice()];

    let solution = TaskDijkstraMin::new().solve(&layers, Some(&origin)).expect("a path");

    assert!((solution.distance as f64 - 13_000.0).abs() < 5.0);
    assert_eq!(solution.points.len(), 2);
}

#[test]
fn empty_layer_has_no_solution() {
    let p = projection();
    let first = vec![point(&p, 0.0, 0.0)];
    let empty: Vec<SearchPoint> = vec![];
    let layers: Vec<&[SearchPoint]> = vec![first.as_slice(), empty.as_slice()];
    assert!(TaskDijkstraMin::new().solve(&layers, None).is_none());
    assert!(TaskDijkstraMax::new().solve(&[], None).is_none());
}
