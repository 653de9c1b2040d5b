use crate::flat::TaskProjection;
use crate::geo::{GeoBounds, GeoPoint, bearing_difference, normalize_bearing};

fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

#[test]
fn distance_of_one_tenth_degree_latitude() {
    let a = GeoPoint::new(52.0, 11.0);
    let b = GeoPoint::new(52.1, 11.0);
    assert_near(a.distance(&b), 11_119.5, 1.0);
    assert_near(b.distance(&a), 11_119.5, 1.0);
}

#[test]
fn bearing_to_cardinal_directions() {
    let origin = GeoPoint::new(0.0, 0.0);
    assert_near(origin.bearing(&GeoPoint::new(1.0, 0.0)), 0.0, 1e-9);
    assert_near(origin.bearing(&GeoPoint::new(0.0, 1.0)), 90.0, 1e-9);
    assert_near(origin.bearing(&GeoPoint::new(-1.0, 0.0)), 180.0, 1e-9);
    assert_near(origin.bearing(&GeoPoint::new(0.0, -1.0)), 270.0, 1e-9);
}

#[test]
fn destination_is_inverse_of_vector() {
    let start = GeoPoint::new(52.0258, 11.2791);
    let target = start.destination(63.0, 25_000.0);
    let vector = start.vector_to(&target);
    assert_near(vector.distance, 25_000.0, 0.5);
    assert_near(vector.bearing, 63.0, 0.01);
}

#[test]
fn intermediate_point_lies_on_the_great_circle() {
    let a = GeoPoint::new(52.0, 11.0);
    let b = GeoPoint::new(52.0, 12.0);
    let total = a.distance(&b);
    let p = a.intermediate_point(&b, 10_000.0);
    assert_near(a.distance(&p), 10_000.0, 0.5);
    assert_near(p.distance(&b), total - 10_000.0, 0.5);
}

#[test]
fn intermediate_point_beyond_target_returns_target() {
    let a = GeoPoint::new(52.0, 11.0);
    let b = GeoPoint::new(52.0, 11.1);
    assert_eq!(a.intermediate_point(&b, 1e6), b);
}

#[test]
fn invalid_point_is_not_valid() {
    assert!(!GeoPoint::invalid().is_valid());
    assert!(GeoPoint::new(-90.0, 180.0).is_valid());
    assert!(!GeoPoint::new(91.0, 0.0).is_valid());
}

#[test]
fn bounds_grow_with_points() {
    let mut bounds = GeoBounds::invalid();
    assert!(!bounds.is_valid());
    bounds.extend(&GeoPoint::new(52.0, 11.0));
    bounds.extend(&GeoPoint::new(51.0, 12.0));
    bounds.extend(&GeoPoint::invalid());
    assert!(bounds.is_valid());
    assert_eq!(bounds.north, 52.0);
    assert_eq!(bounds.south, 51.0);
    assert_eq!(bounds.west, 11.0);
    assert_eq!(bounds.east, 12.0);
    assert!(bounds.contains(&GeoPoint::new(51.5, 11.5)));
    assert_eq!(bounds.center(), GeoPoint::new(51.5, 11.5));
}

#[test]
fn bearing_normalization() {
    assert_near(normalize_bearing(-90.0), 270.0, 1e-9);
    assert_near(normalize_bearing(720.0), 0.0, 1e-9);
    assert_near(bearing_difference(350.0, 10.0), 20.0, 1e-9);
    assert_near(bearing_difference(10.0, 350.0), -20.0, 1e-9);
}

#[test]
fn projection_roundtrip_close_to_center() {
    let mut bounds = GeoBounds::invalid();
    bounds.extend(&GeoPoint::new(52.0, 11.0));
    bounds.extend(&GeoPoint::new(52.5, 11.8));
    let projection = TaskProjection::new(&bounds);

    let point = GeoPoint::new(52.3, 11.1);
    let back = projection.unproject(&projection.project(&point));
    assert_near(back.latitude, point.latitude, 1e-9);
    assert_near(back.longitude, point.longitude, 1e-9);

    let flat_a = projection.project_integer(&GeoPoint::new(52.0, 11.0));
    let flat_b = projection.project_integer(&GeoPoint::new(52.1, 11.0));
    assert_near(flat_a.distance_to(&flat_b), 11_119.5, 2.0);
}
