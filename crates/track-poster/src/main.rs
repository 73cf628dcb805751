mod logging;
mod settings;
mod summary;

use anyhow::Context;
use clap::Parser;
use settings::Settings;
use std::fs;
use summary::RouteSummary;
use track_poster_lib::{export, geometry, route};

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    let _guard = logging::setup_logging();
    run(&settings)
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    match &settings.font {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
            export::register_font(bytes)
                .with_context(|| format!("Failed to load font {}", path.display()))?;
        }
        None => tracing::info!("No --font given, text uses the built-in block font"),
    }

    let xml = fs::read_to_string(&settings.input)
        .with_context(|| format!("Failed to read {}", settings.input.display()))?;
    let route = route::parse_gpx(&xml)
        .with_context(|| format!("Failed to parse {}", settings.input.display()))?;

    tracing::info!(
        "Loaded '{}': {} points, {:.2} km, {:.0} m gain, {}",
        route.name(),
        route.total_points(),
        route.distance() / 1000.0,
        route.elevation_gain(),
        route.activity_type()
    );

    let poster = settings
        .poster_settings(&route)
        .context("Invalid poster settings")?;
    let points = geometry::normalize(route.points(), route.bounding_box());
    let options = settings.export_options();
    let png = export::render_png(&points, &poster, Some(&route), &options)
        .context("Failed to render poster")?;

    let output = settings.output_path(&poster.title);
    fs::write(&output, &png).with_context(|| format!("Failed to write {}", output.display()))?;

    let (width, height) = options.pixel_size();
    tracing::info!(
        "Poster written to {} ({width}x{height}, {} bytes)",
        output.display(),
        png.len()
    );

    if settings.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&RouteSummary::from(&route))?
        );
    }

    Ok(())
}
