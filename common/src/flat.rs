// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Flat (projected) geometry.
//!
//! The task engine works on a local equirectangular projection that is
//! fitted to the bounds of the task. Integer coordinates are meters
//! relative to the projection center, which keeps comparisons and
//! bounding box tests cheap compared to great-circle math.

use crate::geo::{GeoBounds, GeoPoint};
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude.
const METERS_PER_DEGREE: f64 = 111_194.93;

/// A projected point with integer meter resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlatGeoPoint {
    pub x: i32,
    pub y: i32,
}

impl FlatGeoPoint {
    pub fn new(x: i32, y: i32) -> Self {
        FlatGeoPoint { x, y }
    }

    pub fn square_distance_to(&self, other: &FlatGeoPoint) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    pub fn distance_to(&self, other: &FlatGeoPoint) -> f64 {
        (self.square_distance_to(other) as f64).sqrt()
    }

    /// Z component of the cross product `(a - self) x (b - self)`.
    pub fn cross(&self, a: &FlatGeoPoint, b: &FlatGeoPoint) -> i64 {
        let ax = i64::from(a.x) - i64::from(self.x);
        let ay = i64::from(a.y) - i64::from(self.y);
        let bx = i64::from(b.x) - i64::from(self.x);
        let by = i64::from(b.y) - i64::from(self.y);
        ax * by - ay * bx
    }
}

/// A projected point with floating point resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatPoint {
    pub x: f64,
    pub y: f64,
}

impl FlatPoint {
    pub fn new(x: f64, y: f64) -> Self {
        FlatPoint { x, y }
    }

    pub fn distance_to(&self, other: &FlatPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis aligned box in projected integer space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatBoundingBox {
    pub lower: FlatGeoPoint,
    pub upper: FlatGeoPoint,
}

impl FlatBoundingBox {
    /// Box of half-size `radius` centered on `center`.
    pub fn around(center: FlatGeoPoint, radius: i32) -> Self {
        FlatBoundingBox {
            lower: FlatGeoPoint::new(center.x - radius, center.y - radius),
            upper: FlatGeoPoint::new(center.x + radius, center.y + radius),
        }
    }

    /// Smallest box containing all `points`, `None` for an empty input.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a FlatGeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = FlatBoundingBox::around(*first, 0);
        for p in iter {
            bb.expand(p);
        }
        Some(bb)
    }

    pub fn expand(&mut self, point: &FlatGeoPoint) {
        self.lower.x = self.lower.x.min(point.x);
        self.lower.y = self.lower.y.min(point.y);
        self.upper.x = self.upper.x.max(point.x);
        self.upper.y = self.upper.y.max(point.y);
    }

    pub fn grow(&mut self, margin: i32) {
        self.lower.x -= margin;
        self.lower.y -= margin;
        self.upper.x += margin;
        self.upper.y += margin;
    }

    pub fn overlaps(&self, other: &FlatBoundingBox) -> bool {
        self.lower.x <= other.upper.x
            && other.lower.x <= self.upper.x
            && self.lower.y <= other.upper.y
            && other.lower.y <= self.upper.y
    }

    pub fn contains(&self, point: &FlatGeoPoint) -> bool {
        (self.lower.x..=self.upper.x).contains(&point.x)
            && (self.lower.y..=self.upper.y).contains(&point.y)
    }
}

/// Affine mapping from [`GeoPoint`] into a local flat coordinate system.
///
/// A projection is derived from the bounds of all task points and is only
/// replaced as a whole when the task geometry changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskProjection {
    center: GeoPoint,
    cos_center_latitude: f64,
}

impl Default for TaskProjection {
    fn default() -> Self {
        TaskProjection::new(&GeoBounds::from_point(&GeoPoint::new(0.0, 0.0)))
    }
}

impl TaskProjection {
    /// Creates a projection centered on `bounds`. Invalid bounds fall back
    /// to a projection centered on the origin.
    pub fn new(bounds: &GeoBounds) -> Self {
        let center = if bounds.is_valid() {
            bounds.center()
        } else {
            GeoPoint::new(0.0, 0.0)
        };
        TaskProjection {
            center,
            cos_center_latitude: center.latitude.to_radians().cos(),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn project(&self, point: &GeoPoint) -> FlatPoint {
        FlatPoint {
            x: (point.longitude - self.center.longitude) * METERS_PER_DEGREE * self.cos_center_latitude,
            y: (point.latitude - self.center.latitude) * METERS_PER_DEGREE,
        }
    }

    pub fn project_integer(&self, point: &GeoPoint) -> FlatGeoPoint {
        let p = self.project(point);
        FlatGeoPoint::new(p.x.round() as i32, p.y.round() as i32)
    }

    pub fn unproject(&self, point: &FlatPoint) -> GeoPoint {
        GeoPoint::new(
            self.center.latitude + point.y / METERS_PER_DEGREE,
            self.center.longitude + point.x / (METERS_PER_DEGREE * self.cos_center_latitude),
        )
    }

    pub fn unproject_integer(&self, point: &FlatGeoPoint) -> GeoPoint {
        self.unproject(&FlatPoint::new(f64::from(point.x), f64::from(point.y)))
    }
}
