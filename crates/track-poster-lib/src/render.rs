//! Stateless poster drawing procedures
//!
//! Every procedure takes the surface it paints on explicitly; nothing is retained between
//! calls. The surface is any plotters [`DrawingBackend`] already sized for the device pixel
//! ratio, so one surface unit is one pixel.
//!
//! Layout, top to bottom:
//!
//! ```text
//! +------------------------------+
//! |   margin (10% of width)      |
//! |   +----------------------+   |
//! |   |  gallery frame       |   |  75% of height
//! |   |   (route polyline)   |   |
//! |   +----------------------+   |
//! |          TITLE               |  caption at 88%
//! |         subtitle             |
//! |  DIST  ELEV  TIME  PACE      |  stats at 94% / 96.5%
//! +------------------------------+
//! ```

use crate::{NormalizedPoint, PosterSettings, Route, glyphs, stats};
use plotters::style::{Color, FontDesc, FontFamily, FontStyle, RGBAColor, RGBColor, TextStyle, WHITE};
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use plotters_backend::{BackendCoord, DrawingBackend, DrawingErrorKind};

/// Result of a drawing call on backend `DB`
pub type DrawResult<DB> = Result<(), DrawingErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Outer frame margin on every side, as a fraction of the surface width
pub const FRAME_MARGIN_RATIO: f64 = 0.10;
/// Frame height as a fraction of the surface height
pub const FRAME_HEIGHT_RATIO: f64 = 0.75;
/// Vertical center of the title, as a fraction of the surface height
pub const CAPTION_Y_RATIO: f64 = 0.88;
pub const TITLE_FONT_RATIO: f64 = 0.04;
pub const SUBTITLE_FONT_RATIO: f64 = 0.025;
/// Subtitle baseline offset, in title font sizes
const SUBTITLE_SPACING: f64 = 1.2;
pub const STATS_LABEL_Y_RATIO: f64 = 0.94;
pub const STATS_VALUE_Y_RATIO: f64 = 0.965;
const STATS_LABEL_FONT_RATIO: f64 = 0.016;
const STATS_VALUE_FONT_RATIO: f64 = 0.022;

pub const DARK_FRAME_FILL: RGBColor = RGBColor(0x12, 0x12, 0x12);
pub const LIGHT_FRAME_FILL: RGBColor = WHITE;
const DARK_FRAME_BORDER: RGBAColor = RGBAColor(255, 255, 255, 0.15);
const LIGHT_FRAME_BORDER: RGBAColor = RGBAColor(0, 0, 0, 0.1);

/// Round joins are stamped only for strokes wider than this (in pixels)
const ROUND_JOIN_MIN_WIDTH: u32 = 2;

/// Options for [`draw_route`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteStyle {
    pub color: RGBColor,
    /// Line width in pixels
    pub line_width: f64,
    /// Inner padding as a fraction of the frame width
    pub padding: f64,
    /// Near-black frame instead of white
    pub is_dark: bool,
    pub width: f64,
    pub height: f64,
    /// Start dot and finish ring
    pub markers: bool,
}

impl RouteStyle {
    pub fn from_settings(settings: &PosterSettings, width: f64, height: f64) -> Self {
        Self {
            color: settings.theme.palette().stroke,
            line_width: settings.stroke_width,
            padding: settings.padding,
            is_dark: settings.dark_frame,
            width,
            height,
            markers: settings.show_markers,
        }
    }

    fn frame_fill(&self) -> RGBColor {
        if self.is_dark {
            DARK_FRAME_FILL
        } else {
            LIGHT_FRAME_FILL
        }
    }

    fn frame_border(&self) -> RGBAColor {
        if self.is_dark {
            DARK_FRAME_BORDER
        } else {
            LIGHT_FRAME_BORDER
        }
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    /// The gallery frame for a surface of the given size
    pub fn gallery(width: f64, height: f64) -> Self {
        let margin = width * FRAME_MARGIN_RATIO;
        Self {
            x: margin,
            y: margin,
            width: width - margin * 2.0,
            height: height * FRAME_HEIGHT_RATIO,
        }
    }

    /// Shrink by the same absolute amount on every side
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - amount * 2.0,
            height: self.height - amount * 2.0,
        }
    }

    /// Map a unit-square point affinely into this rectangle
    pub fn project(&self, point: &NormalizedPoint) -> BackendCoord {
        (
            px(self.x + point.x * self.width),
            px(self.y + point.y * self.height),
        )
    }

    fn top_left(&self) -> BackendCoord {
        (px(self.x), px(self.y))
    }

    fn bottom_right(&self) -> BackendCoord {
        (px(self.x + self.width), px(self.y + self.height))
    }
}

/// Erase the region to the blank (white) sheet
pub fn clear<DB: DrawingBackend>(surface: &mut DB, width: f64, height: f64) -> DrawResult<DB> {
    fill_region(surface, WHITE, width, height)
}

/// Fill the whole region with the poster background
pub fn draw_background<DB: DrawingBackend>(
    surface: &mut DB,
    color: RGBColor,
    width: f64,
    height: f64,
) -> DrawResult<DB> {
    fill_region(surface, color, width, height)
}

/// Draw the gallery frame and the route polyline inside it.
///
/// Fewer than two points draw nothing at all: a route needs at least one segment.
pub fn draw_route<DB: DrawingBackend>(
    surface: &mut DB,
    points: &[NormalizedPoint],
    style: &RouteStyle,
) -> DrawResult<DB> {
    if points.len() < 2 {
        return Ok(());
    }

    #[cfg(feature = "profiling")]
    profiling::scope!("render::draw_route");

    let frame = FrameRect::gallery(style.width, style.height);
    surface.draw_rect(frame.top_left(), frame.bottom_right(), &style.frame_fill(), true)?;
    surface.draw_rect(
        frame.top_left(),
        frame.bottom_right(),
        &style.frame_border(),
        false,
    )?;

    // Both axes use the same absolute padding, derived from the frame width
    let inner = frame.inset(frame.width * style.padding);
    let mut path: Vec<BackendCoord> = points.iter().map(|p| inner.project(p)).collect();
    path.dedup();

    let stroke = stroke_pixels(style.line_width);
    surface.draw_path(path.iter().copied(), &style.color.stroke_width(stroke))?;

    if stroke > ROUND_JOIN_MIN_WIDTH {
        for &vertex in &path {
            surface.draw_circle(vertex, stroke / 2, &style.color, true)?;
        }
    }

    if style.markers {
        draw_markers(surface, &path, style, stroke)?;
    }

    Ok(())
}

fn draw_markers<DB: DrawingBackend>(
    surface: &mut DB,
    path: &[BackendCoord],
    style: &RouteStyle,
    stroke: u32,
) -> DrawResult<DB> {
    let (Some(&start), Some(&finish)) = (path.first(), path.last()) else {
        return Ok(());
    };

    let dot_radius = radius_pixels(style.line_width * 1.5);
    surface.draw_circle(start, dot_radius, &style.color, true)?;

    let ring_radius = radius_pixels(style.line_width * 2.0);
    surface.draw_circle(finish, ring_radius, &style.frame_fill(), true)?;
    surface.draw_circle(
        finish,
        ring_radius,
        &style.color.stroke_width(stroke),
        false,
    )
}

/// Draw the uppercased title and half-opacity subtitle centered in the footer band.
///
/// Font sizes scale with the surface width. Empty strings are skipped.
pub fn draw_caption<DB: DrawingBackend>(
    surface: &mut DB,
    title: &str,
    subtitle: &str,
    color: RGBColor,
    width: f64,
    height: f64,
) -> DrawResult<DB> {
    let center_x = px(width / 2.0);
    let title_y = height * CAPTION_Y_RATIO;
    let title_size = (width * TITLE_FONT_RATIO).floor();

    if !title.trim().is_empty() {
        draw_centered_text(
            surface,
            &title.to_uppercase(),
            title_size,
            FontStyle::Bold,
            &color,
            (center_x, px(title_y)),
        )?;
    }

    if !subtitle.trim().is_empty() {
        let y = title_y + title_size * SUBTITLE_SPACING;
        draw_centered_text(
            surface,
            &subtitle.to_uppercase(),
            (width * SUBTITLE_FONT_RATIO).floor(),
            FontStyle::Normal,
            &color.mix(0.5),
            (center_x, px(y)),
        )?;
    }

    Ok(())
}

/// Draw the DISTANCE / ELEVATION / TIME / AVG PACE row, one column per stat across the frame
pub fn draw_stats<DB: DrawingBackend>(
    surface: &mut DB,
    route: &Route,
    color: RGBColor,
    width: f64,
    height: f64,
) -> DrawResult<DB> {
    let frame = FrameRect::gallery(width, height);
    let columns = stats::stat_columns(route);
    let column_width = frame.width / columns.len() as f64;

    let label_size = (width * STATS_LABEL_FONT_RATIO).floor();
    let value_size = (width * STATS_VALUE_FONT_RATIO).floor();
    let label_color = color.mix(0.5);
    let label_y = px(height * STATS_LABEL_Y_RATIO);
    let value_y = px(height * STATS_VALUE_Y_RATIO);

    for (i, (label, value)) in columns.iter().enumerate() {
        let x = px(frame.x + column_width * (i as f64 + 0.5));
        draw_centered_text(
            surface,
            label,
            label_size,
            FontStyle::Bold,
            &label_color,
            (x, label_y),
        )?;
        draw_centered_text(
            surface,
            value,
            value_size,
            FontStyle::Bold,
            &color,
            (x, value_y),
        )?;
    }

    Ok(())
}

/// Paint a complete poster: background, framed route, stats row and caption.
///
/// The surface size is taken from the backend. Without a registered font, text is drawn with
/// the built-in block font. Text layers that still fail are skipped with a warning; geometry
/// failures are returned.
pub fn render<DB: DrawingBackend>(
    surface: &mut DB,
    points: &[NormalizedPoint],
    settings: &PosterSettings,
    stats: Option<&Route>,
) -> DrawResult<DB> {
    #[cfg(feature = "profiling")]
    profiling::scope!("render::render");

    let (w, h) = surface.get_size();
    let (width, height) = (w as f64, h as f64);
    let palette = settings.theme.palette();

    clear(surface, width, height)?;
    draw_background(surface, palette.background, width, height)?;
    draw_route(
        surface,
        points,
        &RouteStyle::from_settings(settings, width, height),
    )?;

    if let Some(route) = stats.filter(|_| settings.show_stats) {
        if let Err(e) = draw_stats(surface, route, palette.text, width, height) {
            tracing::warn!("Stats row skipped: {e}");
        }
    }

    if let Err(e) = draw_caption(
        surface,
        &settings.title,
        &settings.subtext,
        palette.text,
        width,
        height,
    ) {
        tracing::warn!("Caption skipped: {e}");
    }

    tracing::trace!(width = w, height = h, points = points.len(), "Poster rendered");
    Ok(())
}

fn fill_region<DB: DrawingBackend>(
    surface: &mut DB,
    color: RGBColor,
    width: f64,
    height: f64,
) -> DrawResult<DB> {
    surface.draw_rect((0, 0), (px(width), px(height)), &color, true)
}

/// Draw text centered on `center`, with the block font when no usable font is registered
fn draw_centered_text<DB: DrawingBackend, C: Color + plotters_backend::BackendStyle>(
    surface: &mut DB,
    text: &str,
    size: f64,
    style: FontStyle,
    color: &C,
    center: BackendCoord,
) -> DrawResult<DB> {
    let text_style: TextStyle<'_> = FontDesc::new(FontFamily::SansSerif, size, style)
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center));

    match surface.draw_text(text, &text_style, center) {
        Err(DrawingErrorKind::FontError(e)) => {
            tracing::debug!("Font unavailable ({e}), drawing '{text}' with the block font");
            glyphs::draw_centered(surface, text, size, color, center)
        }
        result => result,
    }
}

#[inline]
fn px(value: f64) -> i32 {
    value.round() as i32
}

#[inline]
fn stroke_pixels(line_width: f64) -> u32 {
    (line_width.round() as u32).max(1)
}

#[inline]
fn radius_pixels(radius: f64) -> u32 {
    (radius.round() as u32).max(1)
}
