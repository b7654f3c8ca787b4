use crate::error::Result;
use crate::render::font::FAMILY;
use crate::render::{centered_text, palette, write_figure, Figure, ImageFormat};
use crate::table::{finite_value, float_column, string_column};
use arrow::{array::Array, record_batch::RecordBatch};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

/// Horizontal bars, first entry drawn at the top.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub value_label: String,
    /// `(category, value)`; a `None` value keeps its row but draws no bar.
    pub entries: Vec<(String, Option<f64>)>,
}

impl BarChart {
    /// Pull `(label, value)` pairs out of `batch`, in row order.
    pub fn from_batch(
        batch: &RecordBatch,
        label_column: &str,
        value_column: &str,
        title: impl Into<String>,
    ) -> Result<Self> {
        let labels = string_column(batch, label_column)?;
        let values = float_column(batch, value_column)?;
        let entries = (0..batch.num_rows())
            .map(|i| {
                let label = if labels.is_null(i) {
                    String::new()
                } else {
                    labels.value(i).to_string()
                };
                (label, finite_value(values, i))
            })
            .collect();
        Ok(BarChart {
            title: title.into(),
            value_label: value_column.to_string(),
            entries,
        })
    }

    fn x_max(&self) -> f64 {
        let max = self
            .entries
            .iter()
            .filter_map(|(_, v)| *v)
            .fold(0.0f64, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// Category shown at segment `pos` (counted from the bottom).
    fn label_at(&self, pos: usize) -> String {
        self.entries
            .len()
            .checked_sub(pos + 1)
            .and_then(|idx| self.entries.get(idx))
            .map(|(label, _)| label.clone())
            .unwrap_or_default()
    }
}

impl Figure for BarChart {
    fn size(&self) -> (u32, u32) {
        (1000, 600)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        if self.entries.is_empty() {
            root.draw(&Text::new(
                "No rows to display",
                (500, 300),
                centered_text(20, &BLACK),
            ))?;
            return Ok(());
        }

        let n = self.entries.len();
        let x_max = self.x_max();
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, (FAMILY, 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..x_max, (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n + 1)
            .y_label_formatter(&|y| match y {
                SegmentValue::CenterOf(pos) => self.label_at(*pos),
                _ => String::new(),
            })
            .x_desc(self.value_label.as_str())
            .draw()?;

        let colors = palette::viridis_steps(n);
        let bars = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, (_, value))| value.map(|v| (idx, v)))
            .map(|(idx, v)| {
                let pos = n - 1 - idx;
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(pos)), (v, SegmentValue::Exact(pos + 1))],
                    colors[idx].filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            });
        chart.draw_series(bars)?;

        let value_style = (FAMILY, 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(
            self.entries
                .iter()
                .enumerate()
                .filter_map(|(idx, (_, value))| value.map(|v| (idx, v)))
                .map(|(idx, v)| {
                    Text::new(
                        format!(" {:.3}", v),
                        (v, SegmentValue::CenterOf(n - 1 - idx)),
                        value_style.clone(),
                    )
                }),
        )?;

        Ok(())
    }
}

/// Draw the top-N view as a horizontal bar chart, highest score on top.
#[tracing::instrument(level = "info", skip(top, title), fields(path = %path.display()))]
pub fn render_top_n(
    top: &RecordBatch,
    label_column: &str,
    score_column: &str,
    title: &str,
    path: &Path,
    format: ImageFormat,
) -> Result<()> {
    let chart = BarChart::from_batch(top, label_column, score_column, title)?;
    write_figure(&chart, path, format)?;
    info!(bars = chart.entries.len(), "wrote bar chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;
    use crate::table::tests::{sample_batch, sample_rows};
    use crate::table::{project, top_n, COUNTRY_NAME, HAPPINESS_SCORE, WORKING_COLUMNS};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn five_rows_all_drawn() -> anyhow::Result<()> {
        let working = project(&sample_batch(&sample_rows()), &WORKING_COLUMNS)?;
        let top = top_n(&working, HAPPINESS_SCORE, 10)?;
        let chart = BarChart::from_batch(&top, COUNTRY_NAME, HAPPINESS_SCORE, "Top")?;
        assert_eq!(chart.entries.len(), 5);
        assert_eq!(chart.label_at(4), "Finland");
        assert_eq!(chart.label_at(0), "Kenya");

        let tmp = tempdir()?;
        let path = tmp.path().join("bar.svg");
        render_top_n(&top, COUNTRY_NAME, HAPPINESS_SCORE, "Top", &path, ImageFormat::Svg)?;
        let svg = fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Finland"));
        assert!(svg.contains("Kenya"));
        Ok(())
    }

    #[test]
    fn tied_rows_all_kept_in_order() -> anyhow::Result<()> {
        let working = project(
            &sample_batch(&[
                "A,AAA,R1,7.8,1,1,1,1,1,1",
                "B,BBB,R1,6.1,2,2,2,2,2,2",
                "C,CCC,R2,7.8,3,3,3,3,3,3",
            ]),
            &WORKING_COLUMNS,
        )?;
        let top = top_n(&working, HAPPINESS_SCORE, 10)?;
        let chart = BarChart::from_batch(&top, COUNTRY_NAME, HAPPINESS_SCORE, "Top")?;
        let order: Vec<&str> = chart.entries.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
        Ok(())
    }

    #[test]
    fn empty_chart_still_writes() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("empty.svg");
        let chart = BarChart {
            title: "Nothing".into(),
            value_label: "Score".into(),
            entries: Vec::new(),
        };
        write_figure(&chart, &path, ImageFormat::Svg)?;
        assert!(fs::read_to_string(&path)?.contains("No rows to display"));
        Ok(())
    }

    #[test]
    fn missing_output_dir_fails_cleanly() {
        let working = project(&sample_batch(&sample_rows()), &WORKING_COLUMNS).unwrap();
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("missing").join("bar.svg");
        let err = render_top_n(
            &working,
            COUNTRY_NAME,
            HAPPINESS_SCORE,
            "Top",
            &path,
            ImageFormat::Svg,
        )
        .unwrap_err();
        assert!(matches!(err, EdaError::OutputWrite { .. }), "got {err:?}");
        assert!(!path.exists());
    }
}
