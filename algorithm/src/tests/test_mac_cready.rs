use crate::{GlideLeg, solve_chain, solve_legs};
use common::geo::GeoPoint;
use common::glide::{GlidePolar, GlideValidity};

fn legs() -> Vec<GlideLeg> {
    let a = GeoPoint::new(52.0, 11.0);
    let b = a.destination(90.0, 20_000.0);
    let c = b.destination(0.0, 30_000.0);
    vec![GlideLeg::new(a, b, 300.0), GlideLeg::new(b, c, 300.0)]
}

#[test]
fn empty_chain_has_no_solution() {
    let result = solve_chain(&GlidePolar::default(), &[], 1000.0);
    assert_eq!(result.validity, GlideValidity::NoSolution);
}

#[test]
fn chain_distance_is_sum_of_legs() {
    let result = solve_chain(&GlidePolar::default().with_mc(1.0), &legs(), 3000.0);
    assert!((result.vector.distance - 50_000.0).abs() < 1.0);
}

#[test]
fn high_start_is_final_glide() {
    let result = solve_chain(&GlidePolar::default().with_mc(1.0), &legs(), 5000.0);
    assert!(result.is_final_glide());
    assert_eq!(result.height_climb, 0.0);
    assert!(result.altitude_difference > 0.0);
}

#[test]
fn low_start_climbs_the_missing_height() {
    let polar = GlidePolar::default().with_mc(2.0);
    let result = solve_chain(&polar, &legs(), 800.0);
    assert!(result.is_ok());
    assert!(result.height_climb > 0.0);
    // pure glide margin plus climbed height reaches the minimum exactly
    assert!((result.altitude_difference + result.height_climb).abs() < 1e-6);
}

#[test]
fn low_start_without_lift_is_mc_too_low() {
    let result = solve_chain(&GlidePolar::default(), &legs(), 800.0);
    assert_eq!(result.validity, GlideValidity::MacCreadyTooLow);
}

#[test]
fn legs_sum_up_to_the_chain() {
    let polar = GlidePolar::default().with_mc(1.5);
    let per_leg = solve_legs(&polar, &legs(), 1200.0);
    let chain = solve_chain(&polar, &legs(), 1200.0);

    assert_eq!(per_leg.len(), 2);
    let time: f64 = per_leg.iter().map(|r| r.time_elapsed).sum();
    assert!((time - chain.time_elapsed).abs() < 1e-6);
    let climb: f64 = per_leg.iter().map(|r| r.height_climb).sum();
    assert!((climb - chain.height_climb).abs() < 1e-6);
}
