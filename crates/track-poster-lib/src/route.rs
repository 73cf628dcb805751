//! Route storage and parsing module
//!
//! This module provides the `Route` struct for storing a parsed GPS track together with
//! statistics (distance, elevation, timing, activity type) that are derived once at
//! construction and never recomputed.

use crate::geometry::{self, BoundingBox, Point};
use crate::{PosterError, Result};
use chrono::{DateTime, Utc};

/// Name used when neither the track nor the document metadata carries one
pub const UNTITLED_ACTIVITY: &str = "Untitled Activity";

/// Average speed above which an undeclared activity is classified as a ride (~21.6 km/h)
const RIDE_MIN_SPEED_MPS: f64 = 6.0;

/// Average speed above which an undeclared activity is classified as a run (7.2 km/h)
const RUN_MIN_SPEED_MPS: f64 = 2.0;

/// Kind of activity a track records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ActivityType {
    Run,
    Ride,
    Hike,
    Other,
}

impl ActivityType {
    /// Match a declared type string (e.g. GPX `<type>`) case-insensitively against keywords.
    ///
    /// Returns `None` when nothing matches so the caller can fall back to the speed heuristic.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let declared = declared.to_lowercase();
        if declared.contains("run") {
            Some(Self::Run)
        } else if ["bike", "cycl", "ride"].iter().any(|k| declared.contains(k)) {
            Some(Self::Ride)
        } else if ["hike", "walk"].iter().any(|k| declared.contains(k)) {
            Some(Self::Hike)
        } else {
            None
        }
    }

    /// Guess the activity type from the average speed in m/s
    pub fn from_average_speed(average_speed: f64) -> Self {
        if average_speed > RIDE_MIN_SPEED_MPS {
            Self::Ride
        } else if average_speed > RUN_MIN_SPEED_MPS {
            Self::Run
        } else if average_speed > 0.0 {
            Self::Hike
        } else {
            Self::Other
        }
    }

    /// Classify an activity; a recognized declared type always wins over the speed heuristic
    pub fn classify(declared: Option<&str>, average_speed: f64) -> Self {
        declared
            .and_then(Self::from_declared)
            .unwrap_or_else(|| Self::from_average_speed(average_speed))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Ride => "ride",
            Self::Hike => "hike",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents a single parsed GPS track with precomputed statistics
///
/// Deserializing goes through [`RouteRecord`], so statistics are always recomputed from the
/// points and an empty track is rejected.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RouteRecord")
)]
pub struct Route {
    /// Display name of the activity
    name: String,
    /// Human formatted start date, derived from `start_time`
    date: Option<String>,
    /// Canonical start instant (metadata time, else first sample time)
    start_time: Option<DateTime<Utc>>,
    /// Samples in recording order, never empty
    points: Vec<Point>,
    /// Total distance in meters
    distance: f64,
    /// Sum of positive elevation deltas in meters
    elevation_gain: f64,
    min_elevation: Option<f64>,
    max_elevation: Option<f64>,
    /// Wall-clock seconds between the first and last sample
    moving_time: f64,
    /// Meters per second, 0 when the moving time is unknown
    average_speed: f64,
    activity_type: ActivityType,
    bounding_box: BoundingBox,
}

/// The inputs a `Route` is built from; everything else is derived
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct RouteRecord {
    pub name: String,
    pub points: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_time: Option<DateTime<Utc>>,
    /// Overrides the speed heuristic when present
    #[cfg_attr(feature = "serde", serde(default))]
    pub activity_type: Option<ActivityType>,
}

impl TryFrom<RouteRecord> for Route {
    type Error = PosterError;

    fn try_from(record: RouteRecord) -> Result<Self> {
        let mut route = Route::from_points(record.name, record.points, None, record.start_time)?;
        if let Some(activity_type) = record.activity_type {
            route.activity_type = activity_type;
        }
        Ok(route)
    }
}

/// Parse a GPX document into a `Route`.
///
/// Only the first track is used; its segments are joined in document order.
pub fn parse_gpx(xml: &str) -> Result<Route> {
    #[cfg(feature = "profiling")]
    profiling::scope!("route::parse_gpx");

    let gpx = gpx::read(xml.as_bytes())?;
    Route::from_gpx(gpx)
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Route {
    /// Create a new Route from GPX data
    ///
    /// # Returns
    /// The route on success, or `PosterError::EmptyTrack` if the document has no track
    /// or the first track has no points
    pub fn from_gpx(gpx_data: gpx::Gpx) -> Result<Self> {
        let Some(track) = gpx_data.tracks.first() else {
            return Err(PosterError::EmptyTrack);
        };

        if gpx_data.tracks.len() > 1 {
            tracing::warn!(
                "GPX document has {} tracks, only the first one is used",
                gpx_data.tracks.len()
            );
        }

        let points: Vec<Point> = track
            .segments
            .iter()
            .flat_map(|segment| segment.points.iter())
            .map(point_from_waypoint)
            .collect();

        let metadata = gpx_data.metadata.as_ref();
        let name = non_empty(track.name.as_deref())
            .or_else(|| non_empty(metadata.and_then(|m| m.name.as_deref())))
            .unwrap_or(UNTITLED_ACTIVITY)
            .to_string();
        let start_time = metadata
            .and_then(|m| m.time.as_ref())
            .and_then(gpx_time_to_chrono);

        Self::from_points(name, points, track.type_.as_deref(), start_time)
    }

    /// Create a new Route from samples that are already decoded.
    ///
    /// `start_time` falls back to the first sample's timestamp when `None`.
    pub fn from_points(
        name: impl Into<String>,
        points: Vec<Point>,
        declared_type: Option<&str>,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let Some(first) = points.first() else {
            return Err(PosterError::EmptyTrack);
        };

        let start_time = start_time.or(first.timestamp);
        let distance = total_distance(&points);
        let (elevation_gain, min_elevation, max_elevation) = elevation_profile(&points);
        let moving_time = moving_time(&points);
        let average_speed = average_speed(distance, moving_time);
        let activity_type = ActivityType::classify(declared_type, average_speed);
        let bounding_box = geometry::compute_bounding_box(&points);

        let route = Route {
            name: name.into(),
            date: start_time.as_ref().map(format_date),
            start_time,
            points,
            distance,
            elevation_gain,
            min_elevation,
            max_elevation,
            moving_time,
            average_speed,
            activity_type,
            bounding_box,
        };

        tracing::debug!(
            name = %route.name,
            points = route.points.len(),
            distance_m = route.distance,
            elevation_gain_m = route.elevation_gain,
            moving_time_s = route.moving_time,
            activity = %route.activity_type,
            "Parsed route"
        );

        Ok(route)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    #[inline]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// All samples in recording order
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    /// Total distance in meters (haversine, summed over consecutive samples)
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn elevation_gain(&self) -> f64 {
        self.elevation_gain
    }

    #[inline]
    pub fn min_elevation(&self) -> Option<f64> {
        self.min_elevation
    }

    #[inline]
    pub fn max_elevation(&self) -> Option<f64> {
        self.max_elevation
    }

    /// Seconds between the first and last timestamp.
    ///
    /// This is the wall-clock span of the recording: pauses are not excluded.
    #[inline]
    pub fn moving_time(&self) -> f64 {
        self.moving_time
    }

    #[inline]
    pub fn average_speed(&self) -> f64 {
        self.average_speed
    }

    #[inline]
    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }
}

/// `distance / moving_time`, or 0 when the moving time is not positive
#[inline]
pub fn average_speed(distance: f64, moving_time: f64) -> f64 {
    if moving_time > 0.0 {
        distance / moving_time
    } else {
        0.0
    }
}

/// Format an instant as a calendar date plus time of day, e.g. `March 5, 2024 • 07:30`
pub fn format_date(time: &DateTime<Utc>) -> String {
    time.format("%B %-d, %Y • %H:%M").to_string()
}

fn total_distance(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| geometry::haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Returns (gain, min, max) over samples with a known elevation.
///
/// Samples without elevation are skipped: each known sample is compared with the previous
/// known one.
fn elevation_profile(points: &[Point]) -> (f64, Option<f64>, Option<f64>) {
    let mut gain = 0.0;
    let mut previous: Option<f64> = None;
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;

    for elevation in points.iter().filter_map(|p| p.elevation) {
        if let Some(previous) = previous {
            gain += (elevation - previous).max(0.0);
        }
        previous = Some(elevation);
        min = Some(min.map_or(elevation, |m| m.min(elevation)));
        max = Some(max.map_or(elevation, |m| m.max(elevation)));
    }

    (gain, min, max)
}

fn moving_time(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    match (
        points.first().and_then(|p| p.timestamp),
        points.last().and_then(|p| p.timestamp),
    ) {
        (Some(start), Some(end)) => ((end - start).num_milliseconds() as f64 / 1000.0).max(0.0),
        _ => 0.0,
    }
}

fn point_from_waypoint(waypoint: &gpx::Waypoint) -> Point {
    let position = waypoint.point();
    Point {
        latitude: position.y(),
        longitude: position.x(),
        elevation: waypoint.elevation,
        timestamp: waypoint.time.as_ref().and_then(gpx_time_to_chrono),
    }
}

/// Convert gpx Time to chrono DateTime
fn gpx_time_to_chrono(time: &gpx::Time) -> Option<DateTime<Utc>> {
    // gpx::Time wraps time::OffsetDateTime, convert via its RFC 3339 rendering
    let formatted = time.format().ok()?;
    DateTime::parse_from_rfc3339(&formatted)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gpx::{Gpx, Track, TrackSegment, Waypoint};

    fn create_test_waypoint(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(geo::Point::new(lon, lat))
    }

    fn create_test_gpx() -> Gpx {
        let mut gpx = Gpx::default();
        let mut track = Track::default();
        let mut segment = TrackSegment::default();

        // Add a few test points (around London)
        segment.points.push(create_test_waypoint(51.5074, -0.1278));
        segment.points.push(create_test_waypoint(51.5076, -0.1276));
        segment.points.push(create_test_waypoint(51.5078, -0.1274));

        track.segments.push(segment);
        gpx.tracks.push(track);
        gpx
    }

    fn with_elevations(elevations: &[Option<f64>]) -> Vec<Point> {
        elevations
            .iter()
            .enumerate()
            .map(|(i, e)| Point {
                latitude: 46.0 + i as f64 * 0.001,
                longitude: 8.0,
                elevation: *e,
                timestamp: None,
            })
            .collect()
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, h, m, s).unwrap()
    }

    const TRACK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata>
    <name>Sunday Session</name>
    <time>2024-03-05T07:30:00Z</time>
  </metadata>
  <trk>
    <name>Morning Run</name>
    <type>running</type>
    <trkseg>
      <trkpt lat="51.5000" lon="-0.1200"><ele>10</ele><time>2024-03-05T07:31:00Z</time></trkpt>
      <trkpt lat="51.5010" lon="-0.1200"><ele>15</ele><time>2024-03-05T07:32:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="51.5020" lon="-0.1210"><ele>12</ele><time>2024-03-05T07:33:00Z</time></trkpt>
    </trkseg>
  </trk>
  <trk>
    <name>Second Track</name>
    <trkseg>
      <trkpt lat="40.0" lon="3.0"/>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_route_creation() {
        let route = Route::from_gpx(create_test_gpx()).unwrap();

        assert_eq!(route.total_points(), 3);
        assert_eq!(route.name(), UNTITLED_ACTIVITY);
        assert_eq!(route.date(), None);
        assert_eq!(route.moving_time(), 0.0);
        assert_eq!(route.average_speed(), 0.0);
        assert_eq!(route.activity_type(), ActivityType::Other);
    }

    #[test]
    fn test_empty_route_fails() {
        let result = Route::from_gpx(Gpx::default());
        assert!(matches!(result, Err(PosterError::EmptyTrack)));

        let mut gpx = Gpx::default();
        gpx.tracks.push(Track::default());
        assert!(matches!(Route::from_gpx(gpx), Err(PosterError::EmptyTrack)));

        let result = Route::from_points("empty", Vec::new(), None, None);
        assert!(matches!(result, Err(PosterError::EmptyTrack)));
    }

    #[test]
    fn test_route_from_record_recomputes_statistics() {
        let record = RouteRecord {
            name: "Ridge".to_string(),
            points: with_elevations(&[Some(100.0), Some(130.0), Some(120.0)]),
            start_time: Some(at(9, 0, 0)),
            activity_type: Some(ActivityType::Hike),
        };
        let route = Route::try_from(record).unwrap();
        assert_eq!(route.elevation_gain(), 30.0);
        assert_eq!(route.max_elevation(), Some(130.0));
        assert_eq!(route.bounding_box(), geometry::compute_bounding_box(route.points()));
        assert_eq!(route.date(), Some(format_date(&at(9, 0, 0)).as_str()));
        assert_eq!(route.activity_type(), ActivityType::Hike);

        let empty = RouteRecord {
            name: "Nothing".to_string(),
            ..RouteRecord::default()
        };
        assert!(matches!(Route::try_from(empty), Err(PosterError::EmptyTrack)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_route_json_is_validated() {
        let route = Route::from_points("Loop", with_elevations(&[Some(5.0), Some(9.0)]), None, None)
            .unwrap();
        let mut json = serde_json::to_value(&route).unwrap();

        // Tampered statistics are ignored on the way back in
        json["elevation_gain"] = serde_json::json!(9999.0);
        let restored: Route = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restored.elevation_gain(), 4.0);
        assert_eq!(restored.distance(), route.distance());
        assert_eq!(restored.activity_type(), route.activity_type());

        json["points"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Route>(json).is_err());
    }

    #[test]
    fn test_total_distance() {
        let route = Route::from_gpx(create_test_gpx()).unwrap();

        // The test points are very close together (around London)
        assert!(route.distance() > 0.0);
        assert!(route.distance() < 1000.0);
    }

    #[test]
    fn test_bounding_box() {
        let route = Route::from_gpx(create_test_gpx()).unwrap();
        let bbox = route.bounding_box();
        assert_eq!(bbox.min_lat, 51.5074);
        assert_eq!(bbox.max_lat, 51.5078);
        assert_eq!(bbox.min_lon, -0.1278);
        assert_eq!(bbox.max_lon, -0.1274);
    }

    #[test]
    fn test_parse_uses_first_track_and_joins_segments() {
        let route = parse_gpx(TRACK_XML).unwrap();

        assert_eq!(route.name(), "Morning Run");
        assert_eq!(route.total_points(), 3);
        assert_eq!(route.points()[2].latitude, 51.5020);
        assert_eq!(route.activity_type(), ActivityType::Run);
        assert_eq!(route.elevation_gain(), 5.0);
        assert_eq!(route.min_elevation(), Some(10.0));
        assert_eq!(route.max_elevation(), Some(15.0));
        assert_eq!(route.moving_time(), 120.0);
        assert!((route.average_speed() - route.distance() / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_date_prefers_metadata_time() {
        let route = parse_gpx(TRACK_XML).unwrap();
        assert_eq!(route.start_time(), Some(at(7, 30, 0)));
        assert_eq!(route.date(), Some("March 5, 2024 • 07:30"));
    }

    #[test]
    fn test_date_falls_back_to_first_point() {
        let points = vec![
            Point::new(1.0, 1.0).with_timestamp(at(18, 5, 0)),
            Point::new(1.001, 1.0).with_timestamp(at(18, 10, 0)),
        ];
        let route = Route::from_points("Evening", points, None, None).unwrap();
        assert_eq!(route.start_time(), Some(at(18, 5, 0)));
        assert_eq!(route.date(), Some("March 5, 2024 • 18:05"));
        // Same canonical instant gives the same string every time
        assert_eq!(route.date(), route.start_time().as_ref().map(format_date).as_deref());
    }

    #[test]
    fn test_name_falls_back_to_metadata() {
        let xml = TRACK_XML.replace("<name>Morning Run</name>", "");
        let route = parse_gpx(&xml).unwrap();
        assert_eq!(route.name(), "Sunday Session");
    }

    #[test]
    fn test_malformed_input() {
        let result = parse_gpx("this is not a gpx document");
        assert!(matches!(result, Err(PosterError::MalformedInput(_))));
    }

    #[test]
    fn test_elevation_gain_counts_only_climbs() {
        let points = with_elevations(&[Some(100.0), Some(90.0), Some(120.0), Some(115.0)]);
        let route = Route::from_points("climb", points, None, None).unwrap();
        assert_eq!(route.elevation_gain(), 30.0);
        assert_eq!(route.min_elevation(), Some(90.0));
        assert_eq!(route.max_elevation(), Some(120.0));
    }

    #[test]
    fn test_elevation_skips_missing_samples() {
        let points = with_elevations(&[Some(100.0), None, Some(120.0), None, Some(110.0)]);
        let route = Route::from_points("gaps", points, None, None).unwrap();
        assert_eq!(route.elevation_gain(), 20.0);
        assert_eq!(route.min_elevation(), Some(100.0));
        assert_eq!(route.max_elevation(), Some(120.0));
    }

    #[test]
    fn test_elevation_absent() {
        let points = with_elevations(&[None, None]);
        let route = Route::from_points("flat", points, None, None).unwrap();
        assert_eq!(route.elevation_gain(), 0.0);
        assert_eq!(route.min_elevation(), None);
        assert_eq!(route.max_elevation(), None);
    }

    #[test]
    fn test_moving_time_needs_both_endpoints() {
        let points = vec![
            Point::new(1.0, 1.0).with_timestamp(at(8, 0, 0)),
            Point::new(1.001, 1.0).with_timestamp(at(8, 30, 0)),
            Point::new(1.002, 1.0),
        ];
        let route = Route::from_points("partial", points, None, None).unwrap();
        assert_eq!(route.moving_time(), 0.0);
        assert_eq!(route.average_speed(), 0.0);
    }

    #[test]
    fn test_moving_time_includes_pauses() {
        let points = vec![
            Point::new(1.0, 1.0).with_timestamp(at(8, 0, 0)),
            Point::new(1.0, 1.0).with_timestamp(at(8, 45, 0)),
            Point::new(1.001, 1.0).with_timestamp(at(9, 0, 0)),
        ];
        let route = Route::from_points("paused", points, None, None).unwrap();
        assert_eq!(route.moving_time(), 3600.0);
    }

    #[test]
    fn test_average_speed() {
        assert!((average_speed(10_000.0, 3_600.0) - 2.778).abs() < 1e-3);
        assert_eq!(average_speed(10_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_declared_type_keywords() {
        assert_eq!(ActivityType::from_declared("Trail Run"), Some(ActivityType::Run));
        assert_eq!(ActivityType::from_declared("RUNNING"), Some(ActivityType::Run));
        assert_eq!(ActivityType::from_declared("cycling"), Some(ActivityType::Ride));
        assert_eq!(ActivityType::from_declared("Mountain Bike"), Some(ActivityType::Ride));
        assert_eq!(ActivityType::from_declared("Gravel Ride"), Some(ActivityType::Ride));
        assert_eq!(ActivityType::from_declared("Morning Hike"), Some(ActivityType::Hike));
        assert_eq!(ActivityType::from_declared("walk"), Some(ActivityType::Hike));
        assert_eq!(ActivityType::from_declared("swimming"), None);
    }

    #[test]
    fn test_speed_heuristic_thresholds() {
        assert_eq!(ActivityType::from_average_speed(7.0), ActivityType::Ride);
        assert_eq!(ActivityType::from_average_speed(6.0), ActivityType::Run);
        assert_eq!(ActivityType::from_average_speed(3.0), ActivityType::Run);
        assert_eq!(ActivityType::from_average_speed(2.0), ActivityType::Hike);
        assert_eq!(ActivityType::from_average_speed(0.5), ActivityType::Hike);
        assert_eq!(ActivityType::from_average_speed(0.0), ActivityType::Other);
    }

    #[test]
    fn test_declared_type_takes_precedence() {
        // ~111 m in one hour: the heuristic alone would say hike
        let points = vec![
            Point::new(10.0, 10.0).with_timestamp(at(6, 0, 0)),
            Point::new(10.001, 10.0).with_timestamp(at(7, 0, 0)),
        ];
        let route = Route::from_points("slow", points.clone(), Some("Trail Run"), None).unwrap();
        assert_eq!(route.activity_type(), ActivityType::Run);

        let route = Route::from_points("slow", points.clone(), Some("yoga"), None).unwrap();
        assert_eq!(route.activity_type(), ActivityType::Hike);

        let route = Route::from_points("slow", points, None, None).unwrap();
        assert_eq!(route.activity_type(), ActivityType::Hike);
    }

    #[test]
    fn test_activity_type_display() {
        assert_eq!(ActivityType::Ride.to_string(), "ride");
        assert_eq!(ActivityType::Other.name(), "other");
    }
}
