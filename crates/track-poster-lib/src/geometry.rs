//! Geographic bounding boxes and unit-square normalization
//!
//! Everything here is pure: no I/O, no allocation beyond the returned values.

use chrono::{DateTime, Utc};

/// Earth's mean radius in meters, used by the haversine distance
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single GPS sample, in recording order
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Latitude in degrees (positive north)
    pub latitude: f64,
    /// Longitude in degrees (positive east)
    pub longitude: f64,
    /// Elevation in meters, if recorded
    pub elevation: Option<f64>,
    /// Instant at which the sample was taken, if recorded
    pub timestamp: Option<DateTime<Utc>>,
}

impl Point {
    /// Create a point with position only
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            timestamp: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Minimal latitude/longitude rectangle containing a set of points
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[inline]
    pub fn delta_lat(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    #[inline]
    pub fn delta_lon(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Whether the box has zero extent on both axes (single location)
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.delta_lat() == 0.0 && self.delta_lon() == 0.0
    }
}

/// A point projected into the `[0, 1] x [0, 1]` drawing square, y pointing down
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// Compute the bounding box of a point sequence in one linear scan.
///
/// An empty slice yields the all-zero box; callers reject empty tracks before this point.
pub fn compute_bounding_box(points: &[Point]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };

    let mut bbox = BoundingBox {
        min_lat: first.latitude,
        max_lat: first.latitude,
        min_lon: first.longitude,
        max_lon: first.longitude,
    };

    for point in &points[1..] {
        bbox.min_lat = bbox.min_lat.min(point.latitude);
        bbox.max_lat = bbox.max_lat.max(point.latitude);
        bbox.min_lon = bbox.min_lon.min(point.longitude);
        bbox.max_lon = bbox.max_lon.max(point.longitude);
    }

    bbox
}

/// Project points into the unit square, preserving the aspect ratio of the bounding box.
///
/// Both axes are divided by the larger of the two deltas, so the route is never stretched;
/// the narrower axis is centered. Latitude is flipped so north ends up at `y = 0`.
/// When every point coincides the result is `(0.5, 0.5)` for each point.
pub fn normalize(points: &[Point], bounding_box: BoundingBox) -> Vec<NormalizedPoint> {
    #[cfg(feature = "profiling")]
    profiling::scope!("geometry::normalize");

    let delta_lat = bounding_box.delta_lat();
    let delta_lon = bounding_box.delta_lon();
    let scale = delta_lat.max(delta_lon);

    if scale == 0.0 {
        return vec![NormalizedPoint { x: 0.5, y: 0.5 }; points.len()];
    }

    let offset_lon = (scale - delta_lon) / 2.0;
    let offset_lat = (scale - delta_lat) / 2.0;

    points
        .iter()
        .map(|p| NormalizedPoint {
            x: (p.longitude - bounding_box.min_lon + offset_lon) / scale,
            y: 1.0 - (p.latitude - bounding_box.min_lat + offset_lat) / scale,
        })
        .collect()
}

/// Great-circle distance between two points in meters (haversine formula)
#[inline]
pub fn haversine_distance(p1: &Point, p2: &Point) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let delta_lat = (p2.latitude - p1.latitude).to_radians();
    let delta_lon = (p2.longitude - p1.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
