use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use track_poster_lib::{ExportOptions, PosterSettings, Route, Theme};

const STROKE_WIDTH_RANGE: (f64, f64) = (0.5, 10.0);
const PADDING_RANGE: (f64, f64) = (0.05, 0.4);

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Track Poster - Render a GPX activity as a minimalist gallery-framed poster
pub struct Settings {
    /// GPX file to render
    #[clap(value_name = "GPX")]
    pub input: PathBuf,

    /// Output PNG file (default: `<title-slug>-poster.png` next to the input)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Poster width in logical pixels
    #[clap(long, default_value = "1200", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Poster height in logical pixels
    #[clap(long, default_value = "1800", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Device pixel ratio applied to the output bitmap
    #[clap(long, default_value = "1.0", value_parser = parse_scale)]
    pub scale: f64,

    /// Color scheme
    #[clap(long, value_enum, default_value_t = ThemeChoice::Light)]
    pub theme: ThemeChoice,

    /// Background color for the custom theme (#rrggbb or #rgb)
    #[clap(long, value_name = "HEX")]
    pub background: Option<String>,

    /// Route and text color for the custom theme (#rrggbb or #rgb)
    #[clap(long, value_name = "HEX")]
    pub stroke: Option<String>,

    /// Route line width in logical pixels (range: 0.5-10)
    #[clap(long, default_value = "2.0", value_parser = parse_stroke_width)]
    pub stroke_width: f64,

    /// Inner frame padding as a fraction of the frame width (range: 0.05-0.4)
    #[clap(long, default_value = "0.15", value_parser = parse_padding)]
    pub padding: f64,

    /// Near-black gallery frame (default: follows the theme)
    #[clap(long, value_name = "BOOL")]
    pub dark_frame: Option<bool>,

    /// Poster title (default: the track name)
    #[clap(long)]
    pub title: Option<String>,

    /// Line under the title (default: distance and date)
    #[clap(long)]
    pub subtext: Option<String>,

    /// Hide the start and finish markers
    #[clap(long, default_value = "false")]
    pub no_markers: bool,

    /// Hide the distance/elevation/time/pace row
    #[clap(long, default_value = "false")]
    pub no_stats: bool,

    /// TrueType/OpenType font for all text; without it a built-in block font is used
    #[clap(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Print route statistics as JSON on stdout
    #[clap(long, default_value = "false")]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Custom,
}

impl Settings {
    /// Resolve the theme; colors are only parsed for `--theme custom`
    pub fn theme(&self) -> track_poster_lib::Result<Theme> {
        match self.theme {
            ThemeChoice::Light => Ok(Theme::Light),
            ThemeChoice::Dark => Ok(Theme::Dark),
            ThemeChoice::Custom => {
                Theme::custom(self.background.as_deref(), self.stroke.as_deref())
            }
        }
    }

    /// Poster settings for `route`, with command line overrides applied
    pub fn poster_settings(&self, route: &Route) -> track_poster_lib::Result<PosterSettings> {
        let mut settings = PosterSettings::for_route(route).with_theme(self.theme()?);

        if let Some(title) = &self.title {
            settings.title = title.clone();
        }
        if let Some(subtext) = &self.subtext {
            settings.subtext = subtext.clone();
        }
        if let Some(dark_frame) = self.dark_frame {
            settings.dark_frame = dark_frame;
        }
        settings.stroke_width = self.stroke_width;
        settings.padding = self.padding;
        settings.show_markers = !self.no_markers;
        settings.show_stats = !self.no_stats;

        Ok(settings)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            width: self.width,
            height: self.height,
            scale: self.scale,
        }
    }

    /// `--output`, or `<title-slug>-poster.png` beside the input.
    ///
    /// A title with nothing to slugify falls back to the input file stem.
    pub fn output_path(&self, title: &str) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let name = Some(slugify(title))
            .filter(|slug| !slug.is_empty())
            .or_else(|| {
                self.input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "track".to_string());
        self.input.with_file_name(format!("{name}-poster.png"))
    }
}

/// Lowercase `title` and join its words with dashes; path separators become dashes too
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(['/', '\\'], "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn parse_in_range(value: &str, (min, max): (f64, f64)) -> Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if (min..=max).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("must be between {min} and {max}"))
    }
}

fn parse_stroke_width(value: &str) -> Result<f64, String> {
    parse_in_range(value, STROKE_WIDTH_RANGE)
}

fn parse_padding(value: &str) -> Result<f64, String> {
    parse_in_range(value, PADDING_RANGE)
}

fn parse_scale(value: &str) -> Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err("must be a positive number".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_poster_lib::{Point, RGBColor};

    fn parse(args: &[&str]) -> Result<Settings, clap::Error> {
        Settings::try_parse_from(std::iter::once("track-poster").chain(args.iter().copied()))
    }

    fn route() -> Route {
        Route::from_points(
            "Evening Run",
            vec![Point::new(0.0, 0.0), Point::new(0.0, 0.01)],
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&["ride.gpx"]).unwrap();
        assert_eq!(settings.export_options(), ExportOptions::default());
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(
            settings.output_path("Evening Run"),
            PathBuf::from("evening-run-poster.png")
        );

        let poster = settings.poster_settings(&route()).unwrap();
        assert_eq!(poster.title, "Evening Run");
        assert_eq!(poster.subtext, "1.1 KM • Unknown Date");
        assert!(poster.show_markers);
        assert!(poster.show_stats);
        assert!(!poster.dark_frame);
    }

    #[test]
    fn test_output_next_to_input() {
        let settings = parse(&["data/morning.gpx"]).unwrap();
        assert_eq!(
            settings.output_path("Lake  Loop\tNorth"),
            PathBuf::from("data/lake-loop-north-poster.png")
        );
        // Blank titles fall back to the input name
        assert_eq!(
            settings.output_path("   "),
            PathBuf::from("data/morning-poster.png")
        );
        let settings = parse(&["data/morning.gpx", "-o", "out.png"]).unwrap();
        assert_eq!(settings.output_path("Lake Loop"), PathBuf::from("out.png"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Morning Ride"), "morning-ride");
        assert_eq!(slugify("  Col du Galibier  "), "col-du-galibier");
        assert_eq!(slugify("Up/Down Repeats"), "up-down-repeats");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_overrides() {
        let settings = parse(&[
            "ride.gpx",
            "--theme",
            "dark",
            "--dark-frame",
            "false",
            "--title",
            "Col du Galibier",
            "--subtext",
            "",
            "--stroke-width",
            "4",
            "--padding",
            "0.2",
            "--no-markers",
            "--no-stats",
            "--scale",
            "2",
        ])
        .unwrap();

        let poster = settings.poster_settings(&route()).unwrap();
        assert_eq!(poster.theme, Theme::Dark);
        assert!(!poster.dark_frame);
        assert_eq!(poster.title, "Col du Galibier");
        assert_eq!(poster.subtext, "");
        assert_eq!(poster.stroke_width, 4.0);
        assert_eq!(poster.padding, 0.2);
        assert!(!poster.show_markers);
        assert!(!poster.show_stats);
        assert_eq!(settings.export_options().pixel_size(), (2400, 3600));
    }

    #[test]
    fn test_custom_theme_colors() {
        let settings = parse(&[
            "ride.gpx",
            "--theme",
            "custom",
            "--background",
            "#f4ecd8",
            "--stroke",
            "#c0392b",
        ])
        .unwrap();
        let palette = settings.theme().unwrap().palette();
        assert_eq!(palette.background, RGBColor(0xf4, 0xec, 0xd8));
        assert_eq!(palette.text, RGBColor(0xc0, 0x39, 0x2b));

        let bad = parse(&["ride.gpx", "--theme", "custom", "--stroke", "red"]).unwrap();
        assert!(bad.theme().is_err());
        // Colors are ignored by the built-in themes
        let ignored = parse(&["ride.gpx", "--stroke", "red"]).unwrap();
        assert_eq!(ignored.theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(parse(&["ride.gpx", "--stroke-width", "20"]).is_err());
        assert!(parse(&["ride.gpx", "--padding", "0.01"]).is_err());
        assert!(parse(&["ride.gpx", "--scale", "0"]).is_err());
        assert!(parse(&["ride.gpx", "--width", "0"]).is_err());
        assert!(parse(&["ride.gpx", "--theme", "sepia"]).is_err());
        assert!(parse(&[]).is_err());
    }
}
