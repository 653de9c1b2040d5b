// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

/// Upper bound of function evaluations of a single search.
const MAX_ITERATIONS: usize = 100;

/// `(sqrt(5) - 1) / 2`
const INV_GOLDEN_RATIO: f64 = 0.618_033_988_749_895;

/// Closed parameter interval of a one dimensional search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRange {
    pub x_min: f64,
    pub x_max: f64,
    /// Width of the interval at which the search stops.
    pub tolerance: f64,
}

impl SearchRange {
    pub fn new(x_min: f64, x_max: f64, tolerance: f64) -> Self {
        SearchRange {
            x_min,
            x_max,
            tolerance,
        }
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.x_min, self.x_max)
    }
}

/// A scalar function searched over a bounded parameter.
///
/// Implementors provide the function and the parameter range; the search
/// strategies come with the trait. `f` takes `&mut self` because most
/// implementors modify task state (targets, polar settings) while they are
/// evaluated.
pub trait ZeroFinder {
    /// The function value at `x`.
    fn f(&mut self, x: f64) -> f64;

    /// The parameter range that is searched.
    fn range(&self) -> SearchRange;

    /// Finds `x` with `f(x) == 0` by bisection.
    ///
    /// # Parameters
    /// - `guess`: A starting value, returned immediately if it is already a root.
    ///
    /// # Returns
    /// `None` if `f` has no sign change over the range. On success the last
    /// evaluation of `f` was at the returned value.
    fn find_zero(&mut self, guess: f64) -> Option<f64> {
        let range = self.range();
        let guess = range.clamp(guess);
        let f_guess = self.f(guess);
        if f_guess.abs() <= f64::EPSILON {
            return Some(guess);
        }

        let mut lower = range.x_min;
        let mut upper = range.x_max;
        let mut f_lower = self.f(lower);
        let f_upper = self.f(upper);
        if !f_lower.is_finite() || !f_upper.is_finite() {
            return None;
        }
        if f_lower == 0.0 {
            self.f(lower);
            return Some(lower);
        }
        if f_upper == 0.0 {
            return Some(upper);
        }
        if f_lower.signum() == f_upper.signum() {
            return None;
        }

        // narrow the interval with the guess first
        if f_guess.is_finite() && guess > lower && guess < upper {
            if f_guess.signum() == f_lower.signum() {
                lower = guess;
                f_lower = f_guess;
            } else {
                upper = guess;
            }
        }

        for _ in 0..MAX_ITERATIONS {
            if upper - lower <= range.tolerance {
                break;
            }
            let mid = 0.5 * (lower + upper);
            let f_mid = self.f(mid);
            if f_mid == 0.0 {
                return Some(mid);
            }
            if f_mid.signum() == f_lower.signum() {
                lower = mid;
                f_lower = f_mid;
            } else {
                upper = mid;
            }
        }
        let x = 0.5 * (lower + upper);
        self.f(x);
        Some(x)
    }

    /// Finds the `x` with the smallest `f(x)` by golden-section search.
    ///
    /// The function is assumed to be unimodal over the range. The result is
    /// never worse than `guess`.
    fn find_min(&mut self, guess: f64) -> f64 {
        let range = self.range();
        let guess = range.clamp(guess);
        let f_guess = self.f(guess);

        let mut a = range.x_min;
        let mut b = range.x_max;
        let mut c = b - INV_GOLDEN_RATIO * (b - a);
        let mut d = a + INV_GOLDEN_RATIO * (b - a);
        let mut f_c = self.f(c);
        let mut f_d = self.f(d);

        for _ in 0..MAX_ITERATIONS {
            if (b - a).abs() <= range.tolerance {
                break;
            }
            if f_c < f_d {
                b = d;
                d = c;
                f_d = f_c;
                c = b - INV_GOLDEN_RATIO * (b - a);
                f_c = self.f(c);
            } else {
                a = c;
                c = d;
                f_c = f_d;
                d = a + INV_GOLDEN_RATIO * (b - a);
                f_d = self.f(d);
            }
        }

        let x = 0.5 * (a + b);
        let f_x = self.f(x);
        if f_guess.is_finite() && (f_guess < f_x || !f_x.is_finite()) {
            // leave the implementor in the state of the returned value
            self.f(guess);
            guess
        } else {
            x
        }
    }
}
