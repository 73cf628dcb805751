//! Poster themes and caller-owned rendering settings
//!
//! A [`Theme`] is resolved once into a concrete [`Palette`] before anything is drawn, so the
//! render engine never branches on theme identity.

use crate::{PosterError, Result, Route, stats};
use plotters::style::{BLACK, RGBColor, WHITE};

/// Background used by `Theme::Custom` when the caller gives none
pub const DEFAULT_CUSTOM_BACKGROUND: RGBColor = WHITE;

/// Stroke used by `Theme::Custom` when the caller gives none
pub const DEFAULT_CUSTOM_STROKE: RGBColor = BLACK;

/// Closed set of poster color schemes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Theme {
    Light,
    Dark,
    Custom {
        background: RGBColor,
        stroke: RGBColor,
    },
}

/// Concrete colors a poster is painted with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub stroke: RGBColor,
    pub text: RGBColor,
}

impl Theme {
    /// Build a custom theme from `#rrggbb`/`#rgb` strings, defaulting missing colors
    pub fn custom(background: Option<&str>, stroke: Option<&str>) -> Result<Self> {
        Ok(Self::Custom {
            background: background
                .map(parse_hex_color)
                .transpose()?
                .unwrap_or(DEFAULT_CUSTOM_BACKGROUND),
            stroke: stroke
                .map(parse_hex_color)
                .transpose()?
                .unwrap_or(DEFAULT_CUSTOM_STROKE),
        })
    }

    pub fn palette(&self) -> Palette {
        match *self {
            Self::Light => Palette {
                background: WHITE,
                stroke: BLACK,
                text: BLACK,
            },
            Self::Dark => Palette {
                background: BLACK,
                stroke: WHITE,
                text: WHITE,
            },
            Self::Custom { background, stroke } => Palette {
                background,
                stroke,
                text: stroke,
            },
        }
    }

    #[inline]
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Rendering configuration owned by the caller.
///
/// Values are expected in their documented ranges (stroke 0.5-10 px, padding 0.05-0.4);
/// the render engine does not clamp them.
#[derive(Clone, Debug, PartialEq)]
pub struct PosterSettings {
    pub title: String,
    pub subtext: String,
    pub theme: Theme,
    /// Route line width in pixels
    pub stroke_width: f64,
    /// Inner frame padding as a fraction of the frame width
    pub padding: f64,
    /// Paint the gallery frame near-black instead of white
    pub dark_frame: bool,
    /// Mark the start (dot) and finish (ring) of the route
    pub show_markers: bool,
    /// Draw the distance/elevation/time/pace row when stats are supplied
    pub show_stats: bool,
}

impl Default for PosterSettings {
    fn default() -> Self {
        Self {
            title: "My Activity".to_string(),
            subtext: String::new(),
            theme: Theme::Light,
            stroke_width: 2.0,
            padding: 0.15,
            dark_frame: false,
            show_markers: true,
            show_stats: true,
        }
    }
}

impl PosterSettings {
    /// Settings pre-filled from a parsed route: its name as title, distance and date as subtext
    pub fn for_route(route: &Route) -> Self {
        Self {
            title: route.name().to_string(),
            subtext: stats::default_subtext(route),
            ..Default::default()
        }
    }

    /// Switch theme; the frame follows the theme's darkness
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self.dark_frame = theme.is_dark();
        self
    }
}

/// Parse `#rrggbb` or `#rgb` into a color
pub fn parse_hex_color(value: &str) -> Result<RGBColor> {
    let invalid = || PosterError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            // #abc expands to #aabbcc
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(RGBColor(short(0)?, short(1)?, short(2)?))
        }
        _ => Err(invalid()),
    }
}
