// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters used for all great-circle calculations.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Represents a geographical coordinate with latitude and longitude.
///
/// Latitude values range from -90.0 to 90.0, and longitude values range
/// from -180.0 to 180.0, both in decimal degrees. A point with a `NaN`
/// coordinate is considered invalid, see [`GeoPoint::invalid`].
///
/// # Example
///
/// ```rust
/// use common::geo::GeoPoint;
///
/// let a = GeoPoint::new(52.0, 11.0);
/// let b = GeoPoint::new(52.1, 11.0);
/// assert!((a.distance(&b) - 11119.5).abs() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new [`GeoPoint`] with the given latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Returns a point that reports `false` from [`GeoPoint::is_valid`].
    pub fn invalid() -> Self {
        GeoPoint {
            latitude: f64::NAN,
            longitude: f64::NAN,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in meters (haversine).
    pub fn distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS * a.sqrt().min(1.0).asin()
    }

    /// Initial bearing towards `other` in degrees, normalized to `[0, 360)`.
    pub fn bearing(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();
        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        normalize_bearing(y.atan2(x).to_degrees())
    }

    /// Distance and bearing towards `other`.
    pub fn vector_to(&self, other: &GeoPoint) -> GeoVector {
        GeoVector {
            distance: self.distance(other),
            bearing: self.bearing(other),
        }
    }

    /// Point reached by travelling `distance` meters along `bearing` degrees.
    pub fn destination(&self, bearing: f64, distance: f64) -> GeoPoint {
        let delta = distance / EARTH_RADIUS;
        let theta = bearing.to_radians();
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
        GeoPoint::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
    }

    /// Point on the great circle towards `other` at the given fraction
    /// of the total distance (0 = self, 1 = other).
    pub fn interpolate(&self, other: &GeoPoint, fraction: f64) -> GeoPoint {
        let total = self.distance(other);
        if total <= f64::EPSILON {
            return *self;
        }
        let delta = total / EARTH_RADIUS;
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let a = ((1.0 - fraction) * delta).sin() / delta.sin();
        let b = (fraction * delta).sin() / delta.sin();
        let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
        let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
        let z = a * lat1.sin() + b * lat2.sin();
        GeoPoint::new(
            z.atan2((x * x + y * y).sqrt()).to_degrees(),
            y.atan2(x).to_degrees(),
        )
    }

    /// Point `distance` meters from self on the great circle towards `other`.
    ///
    /// If `distance` exceeds the distance to `other`, `other` is returned.
    pub fn intermediate_point(&self, other: &GeoPoint, distance: f64) -> GeoPoint {
        let total = self.distance(other);
        if total <= f64::EPSILON || distance >= total {
            return *other;
        }
        self.interpolate(other, distance / total)
    }
}

/// Distance (meters) and bearing (degrees) between two points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoVector {
    pub distance: f64,
    pub bearing: f64,
}

impl GeoVector {
    pub fn zero() -> Self {
        GeoVector::default()
    }
}

/// A latitude/longitude aligned bounding region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for GeoBounds {
    fn default() -> Self {
        GeoBounds::invalid()
    }
}

impl GeoBounds {
    /// Degenerate bounds containing exactly `point`.
    pub fn from_point(point: &GeoPoint) -> Self {
        GeoBounds {
            north: point.latitude,
            south: point.latitude,
            east: point.longitude,
            west: point.longitude,
        }
    }

    pub fn invalid() -> Self {
        GeoBounds {
            north: f64::NAN,
            south: f64::NAN,
            east: f64::NAN,
            west: f64::NAN,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.north.is_finite() && self.south <= self.north && self.west <= self.east
    }

    /// Grows the bounds so that they contain `point`.
    pub fn extend(&mut self, point: &GeoPoint) {
        if !point.is_valid() {
            return;
        }
        if !self.is_valid() {
            *self = GeoBounds::from_point(point);
            return;
        }
        self.north = self.north.max(point.latitude);
        self.south = self.south.min(point.latitude);
        self.east = self.east.max(point.longitude);
        self.west = self.west.min(point.longitude);
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.is_valid()
            && (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

/// Normalizes a bearing in degrees to `[0, 360)`.
pub fn normalize_bearing(bearing: f64) -> f64 {
    let b = bearing % 360.0;
    if b < 0.0 { b + 360.0 } else { b }
}

/// Smallest signed angle from `from` to `to` in degrees, within `(-180, 180]`.
pub fn bearing_difference(from: f64, to: f64) -> f64 {
    let d = normalize_bearing(to - from);
    if d > 180.0 { d - 360.0 } else { d }
}

fn normalize_longitude(longitude: f64) -> f64 {
    let l = (longitude + 540.0) % 360.0 - 180.0;
    if l == -180.0 { 180.0 } else { l }
}
