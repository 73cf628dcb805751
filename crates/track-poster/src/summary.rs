use chrono::{DateTime, Utc};
use serde::Serialize;
use track_poster_lib::{ActivityType, BoundingBox, Route};

/// Route statistics as printed by `--json`
#[derive(Debug, Serialize)]
pub struct RouteSummary<'a> {
    pub name: &'a str,
    pub date: Option<&'a str>,
    pub start_time: Option<DateTime<Utc>>,
    pub activity_type: ActivityType,
    pub total_points: usize,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub min_elevation_m: Option<f64>,
    pub max_elevation_m: Option<f64>,
    pub moving_time_s: f64,
    pub average_speed_mps: f64,
    pub bounding_box: BoundingBox,
}

impl<'a> From<&'a Route> for RouteSummary<'a> {
    fn from(route: &'a Route) -> Self {
        Self {
            name: route.name(),
            date: route.date(),
            start_time: route.start_time(),
            activity_type: route.activity_type(),
            total_points: route.total_points(),
            distance_m: route.distance(),
            elevation_gain_m: route.elevation_gain(),
            min_elevation_m: route.min_elevation(),
            max_elevation_m: route.max_elevation(),
            moving_time_s: route.moving_time(),
            average_speed_mps: route.average_speed(),
            bounding_box: route.bounding_box(),
        }
    }
}
