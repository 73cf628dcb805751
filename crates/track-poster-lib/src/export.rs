//! Raster export: render a poster into an in-memory RGB buffer and encode it as PNG

use crate::{NormalizedPoint, PosterError, PosterSettings, Result, Route, render};
use image::{ImageFormat, RgbImage};
use plotters::prelude::BitMapBackend;
use plotters::style::FontStyle;
use plotters_backend::DrawingBackend;
use std::io::Cursor;

/// Font family name every text layer is drawn with
const FONT_FAMILY: &str = "sans-serif";

/// Output size of an exported poster
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOptions {
    /// Logical width
    pub width: u32,
    /// Logical height
    pub height: u32,
    /// Device pixel ratio; the bitmap is `width * scale` by `height * scale`
    pub scale: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1800,
            scale: 1.0,
        }
    }
}

impl ExportOptions {
    /// Bitmap size in device pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.scale).round() as u32,
            (self.height as f64 * self.scale).round() as u32,
        )
    }
}

/// Render a poster and return the PNG-encoded bytes
pub fn render_png(
    points: &[NormalizedPoint],
    settings: &PosterSettings,
    stats: Option<&Route>,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let (width, height) = options.pixel_size();
    let rgb = render_rgb(points, settings, stats, options)?;
    encode_png(rgb, width, height)
}

/// Render a poster into a packed RGB buffer of [`ExportOptions::pixel_size`]
pub fn render_rgb(
    points: &[NormalizedPoint],
    settings: &PosterSettings,
    stats: Option<&Route>,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("export::render_rgb");

    let (width, height) = options.pixel_size();
    if width == 0 || height == 0 {
        return Err(PosterError::Render(format!(
            "output size {width}x{height} is empty"
        )));
    }

    // Lengths given in logical pixels follow the device pixel ratio
    let scaled = PosterSettings {
        stroke_width: settings.stroke_width * options.scale,
        ..settings.clone()
    };

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let mut backend = BitMapBackend::with_buffer(&mut buffer, (width, height));
        render::render(&mut backend, points, &scaled, stats)
            .map_err(|e| PosterError::Render(e.to_string()))?;
        backend
            .present()
            .map_err(|e| PosterError::Render(e.to_string()))?;
    }

    tracing::debug!(width, height, "Poster rasterized");
    Ok(buffer)
}

/// Encode a packed RGB buffer as PNG
pub fn encode_png(rgb: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
        PosterError::Render(format!("buffer does not hold {width}x{height} RGB pixels"))
    })?;

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Register TrueType/OpenType font data for all poster text.
///
/// Without a registered font, the caption and stats row are drawn with a built-in block font.
/// The data is kept for the lifetime of the process, so call this once at startup.
pub fn register_font(bytes: Vec<u8>) -> Result<()> {
    let data: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    for style in [FontStyle::Normal, FontStyle::Bold] {
        plotters::style::register_font(FONT_FAMILY, style, data)
            .map_err(|_| PosterError::Font("unsupported or corrupt font data".to_string()))?;
    }
    tracing::debug!(bytes = data.len(), "Registered poster font");
    Ok(())
}
