use crate::{SearchRange, ZeroFinder};

struct Quadratic {
    root: f64,
    evaluations: usize,
    last_x: f64,
}

impl ZeroFinder for Quadratic {
    fn f(&mut self, x: f64) -> f64 {
        self.evaluations += 1;
        self.last_x = x;
        (x - self.root) * (x + self.root)
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(0.0, 10.0, 1e-6)
    }
}

fn quadratic(root: f64) -> Quadratic {
    Quadratic {
        root,
        evaluations: 0,
        last_x: f64::NAN,
    }
}

#[test]
fn find_zero_of_quadratic() {
    let mut finder = quadratic(3.0);
    let x = finder.find_zero(5.0).expect("a root in range");
    assert!((x - 3.0).abs() < 1e-5);
    assert_eq!(finder.last_x, x);
    assert!(finder.evaluations <= 110);
}

#[test]
fn find_zero_accepts_exact_guess() {
    let mut finder = quadratic(2.0);
    assert_eq!(finder.find_zero(2.0), Some(2.0));
    assert_eq!(finder.evaluations, 1);
}

#[test]
fn find_zero_without_sign_change() {
    let mut finder = quadratic(20.0);
    assert_eq!(finder.find_zero(5.0), None);
}

struct Parabola {
    minimum: f64,
}

impl ZeroFinder for Parabola {
    fn f(&mut self, x: f64) -> f64 {
        (x - self.minimum).powi(2) + 1.0
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(-5.0, 5.0, 1e-6)
    }
}

#[test]
fn find_min_of_parabola() {
    let mut finder = Parabola { minimum: 1.5 };
    let x = finder.find_min(0.0);
    assert!((x - 1.5).abs() < 1e-4);
}

#[test]
fn find_min_at_range_edge() {
    let mut finder = Parabola { minimum: 8.0 };
    let x = finder.find_min(0.0);
    assert!((x - 5.0).abs() < 1e-4);
}
