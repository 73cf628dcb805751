//! Track Poster Library - GPX Parsing, Activity Statistics and Poster Rendering
//!
//! This library turns a single GPS track recording into a minimalist "poster": the route is
//! projected into an aspect-preserving unit square and painted inside a gallery frame, with
//! optional endpoint markers, a stats row and a caption.
//!
//! # Architecture
//!
//! - **[`geometry`]**: Bounding boxes and unit-square normalization (pure functions)
//! - **[`Route`]**: Immutable parsed track with statistics derived once at construction
//! - **[`render`]**: Stateless drawing procedures over any plotters [`DrawingBackend`]
//! - **[`export`]**: Rasterization into PNG bytes for a requested output size and pixel scale
//! - **[`FrameScheduler`]**: Latest-request-wins coalescing for hosts that redraw on demand
//!
//! # Example
//!
//! ```no_run
//! use track_poster_lib::{ExportOptions, PosterSettings, geometry, route, export};
//!
//! # fn main() -> track_poster_lib::Result<()> {
//! let xml = std::fs::read_to_string("activity.gpx")?;
//! let route = route::parse_gpx(&xml)?;
//! let points = geometry::normalize(route.points(), route.bounding_box());
//! let settings = PosterSettings::for_route(&route);
//! let png = export::render_png(&points, &settings, Some(&route), &ExportOptions::default())?;
//! std::fs::write("poster.png", png)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`DrawingBackend`]: plotters_backend::DrawingBackend

pub mod export;
pub mod geometry;
mod glyphs;
pub mod render;
pub mod route;
mod schedule;
pub mod stats;
mod theme;

// Public API exports
pub use export::ExportOptions;
pub use geometry::{BoundingBox, NormalizedPoint, Point};
pub use plotters::style::RGBColor;
pub use render::RouteStyle;
pub use route::{ActivityType, Route, RouteRecord};
pub use schedule::{FrameScheduler, FrameTicket};
pub use theme::{Palette, PosterSettings, Theme, parse_hex_color};

/// Error types for parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error("GPX parsing error: {0}")]
    MalformedInput(#[from] gpx::errors::GpxError),

    #[error("No track points found in GPX document")]
    EmptyTrack,

    #[error("Invalid color '{0}', expected #rrggbb or #rgb")]
    InvalidColor(String),

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid font: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PosterError>;
