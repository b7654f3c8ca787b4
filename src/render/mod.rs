//! Chart output. Static charts go through plotters; the scatter plot is a
//! standalone HTML page driven by plotly.js.

use crate::error::{EdaError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub mod bar;
pub mod font;
pub mod heatmap;
pub mod palette;
pub mod scatter;

/// File format for the static charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster output.
    #[default]
    Png,
    /// Vector output.
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// A static chart that can be drawn onto any plotters backend.
pub(crate) trait Figure {
    fn size(&self) -> (u32, u32);

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>>;
}

/// Fail with [`EdaError::OutputWrite`] unless the directory `path` will be
/// written into exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if parent.is_dir() {
        Ok(())
    } else {
        Err(EdaError::output_write(
            path,
            format!("output directory {} does not exist", parent.display()),
        ))
    }
}

/// Draw `figure` to `path` in the requested format.
pub(crate) fn write_figure<F: Figure>(figure: &F, path: &Path, format: ImageFormat) -> Result<()> {
    ensure_parent_dir(path)?;
    font::ensure_registered()?;
    debug!(path = %path.display(), ?format, "drawing figure");
    match format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
            finish(figure, &root, path)
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, figure.size()).into_drawing_area();
            finish(figure, &root, path)
        }
    }
}

fn finish<F: Figure, DB: DrawingBackend>(
    figure: &F,
    root: &DrawingArea<DB, Shift>,
    path: &Path,
) -> Result<()> {
    figure
        .draw(root)
        .map_err(|e| EdaError::output_write(path, e))?;
    root.present().map_err(|e| EdaError::output_write(path, e))
}

/// Text style centred on its anchor point.
pub(crate) fn centered_text(size: u32, color: &RGBColor) -> TextStyle<'static> {
    use plotters::style::text_anchor::{HPos, Pos, VPos};
    (font::FAMILY, size)
        .into_font()
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center))
}
