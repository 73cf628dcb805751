//! Display formatting for route statistics (metric units only)

use crate::Route;

/// Placeholder shown in place of a missing start date
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// `12.3 KM`
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.1} KM", meters / 1000.0)
}

/// `431 M`
pub fn format_elevation(meters: f64) -> String {
    format!("{} M", meters.round() as i64)
}

/// `h:mm:ss` from one hour upwards, `m:ss` below
pub fn format_duration(seconds: f64) -> String {
    if seconds.is_nan() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Minutes and seconds per kilometer, `4:10 /KM`
pub fn format_pace(meters_per_second: f64) -> String {
    if meters_per_second.is_nan() || meters_per_second <= 0.0 {
        return "0:00 /KM".to_string();
    }
    let seconds_per_km = 1000.0 / meters_per_second;
    let m = (seconds_per_km / 60.0).floor() as u64;
    let s = (seconds_per_km % 60.0).floor() as u64;
    format!("{m}:{s:02} /KM")
}

/// Default poster subtitle: `42.2 KM • March 5, 2024 • 07:30`
pub fn default_subtext(route: &Route) -> String {
    format!(
        "{} • {}",
        format_distance_km(route.distance()),
        route.date().unwrap_or(UNKNOWN_DATE)
    )
}

/// Label/value pairs for the poster stats row, in display order
pub fn stat_columns(route: &Route) -> [(&'static str, String); 4] {
    [
        ("DISTANCE", format_distance_km(route.distance())),
        ("ELEVATION", format_elevation(route.elevation_gain())),
        ("TIME", format_duration(route.moving_time())),
        ("AVG PACE", format_pace(route.average_speed())),
    ]
}
