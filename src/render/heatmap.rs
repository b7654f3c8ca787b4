use crate::error::Result;
use crate::render::font::FAMILY;
use crate::render::{centered_text, palette, write_figure, Figure, ImageFormat};
use crate::table::CorrelationMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Annotated heatmap of a correlation matrix. The first column is drawn in
/// the top row.
#[derive(Debug, Clone)]
pub struct Heatmap<'a> {
    pub title: String,
    pub matrix: &'a CorrelationMatrix,
}

/// Cell annotation: two decimals, or `nan` for undefined coefficients.
pub fn cell_label(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", value)
    }
}

impl Heatmap<'_> {
    fn column_name(&self, idx: usize) -> String {
        self.matrix.columns.get(idx).cloned().unwrap_or_default()
    }

    fn row_name(&self, pos: usize) -> String {
        self.matrix
            .len()
            .checked_sub(pos + 1)
            .map(|idx| self.column_name(idx))
            .unwrap_or_default()
    }
}

impl Figure for Heatmap<'_> {
    fn size(&self) -> (u32, u32) {
        (1000, 800)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let n = self.matrix.len();
        if n == 0 {
            root.draw(&Text::new(
                "No numeric columns",
                (500, 400),
                centered_text(20, &BLACK),
            ))?;
            return Ok(());
        }

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, (FAMILY, 22))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(220)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n + 1)
            .y_labels(n + 1)
            .x_label_style((FAMILY, 11))
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(idx) => self.column_name(*idx),
                _ => String::new(),
            })
            .y_label_formatter(&|y| match y {
                SegmentValue::CenterOf(pos) => self.row_name(*pos),
                _ => String::new(),
            })
            .draw()?;

        // (column, position from bottom, value)
        let cells: Vec<(usize, usize, f64)> = (0..n)
            .flat_map(|row| (0..n).map(move |col| (col, n - 1 - row, row)))
            .map(|(col, pos, row)| (col, pos, self.matrix.get(row, col)))
            .collect();

        chart.draw_series(cells.iter().map(|&(col, pos, v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(col), SegmentValue::Exact(pos)),
                    (SegmentValue::Exact(col + 1), SegmentValue::Exact(pos + 1)),
                ],
                palette::coolwarm(v).filled(),
            )
        }))?;

        chart.draw_series(cells.iter().map(|&(col, pos, v)| {
            let ink = if !v.is_nan() && v.abs() > 0.6 {
                WHITE
            } else {
                BLACK
            };
            Text::new(
                cell_label(v),
                (SegmentValue::CenterOf(col), SegmentValue::CenterOf(pos)),
                centered_text(14, &ink),
            )
        }))?;

        Ok(())
    }
}

/// Draw `matrix` as an annotated heatmap.
#[tracing::instrument(level = "info", skip(matrix, title), fields(path = %path.display()))]
pub fn render_correlation(
    matrix: &CorrelationMatrix,
    title: &str,
    path: &Path,
    format: ImageFormat,
) -> Result<()> {
    let figure = Heatmap {
        title: title.to_string(),
        matrix,
    };
    write_figure(&figure, path, format)?;
    info!(columns = matrix.len(), "wrote correlation heatmap");
    Ok(())
}
