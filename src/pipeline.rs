//! Load, project, and render the three charts, in that order.

use crate::config::EdaConfig;
use crate::error::Result;
use crate::load::load_csv;
use crate::render::{bar, heatmap, scatter, scatter::ScatterColumns};
use crate::table::{
    correlation_matrix, project, top_n, COUNTRY_NAME, GDP_PER_CAPITA, HAPPINESS_SCORE, REGION,
    WORKING_COLUMNS,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

const HEATMAP_TITLE: &str = "Correlation Heatmap of Happiness Factors";
const SCATTER_TITLE: &str = "GDP per Capita vs Happiness Score (Interactive)";

/// What a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub rows_ranked: usize,
    pub numeric_columns: usize,
    pub artifacts: Vec<PathBuf>,
}

/// Run the whole analysis described by `config`.
///
/// Nothing is written if loading or projection fails. A failure while
/// rendering leaves any earlier artifacts in place.
#[tracing::instrument(level = "info", skip(config), fields(input = %config.input.display()))]
pub fn run(config: &EdaConfig) -> Result<RunSummary> {
    let start = Instant::now();
    config.validate()?;

    let raw = load_csv(&config.input)?;
    let working = project(&raw, &WORKING_COLUMNS)?;
    let paths = config.output_paths();

    let top = top_n(&working, HAPPINESS_SCORE, config.top_n)?;
    bar::render_top_n(
        &top,
        COUNTRY_NAME,
        HAPPINESS_SCORE,
        &format!("Top {} Happiest Countries (2023)", config.top_n),
        &paths.bar,
        config.image_format,
    )?;

    let matrix = correlation_matrix(&working);
    heatmap::render_correlation(&matrix, HEATMAP_TITLE, &paths.heatmap, config.image_format)?;

    scatter::render_scatter(
        &working,
        ScatterColumns {
            x: GDP_PER_CAPITA,
            y: HAPPINESS_SCORE,
            color: REGION,
            hover: COUNTRY_NAME,
        },
        SCATTER_TITLE,
        &paths.scatter,
    )?;

    info!(elapsed = ?start.elapsed(), "all charts written");
    Ok(RunSummary {
        rows_loaded: working.num_rows(),
        rows_ranked: top.num_rows(),
        numeric_columns: matrix.len(),
        artifacts: vec![paths.bar, paths.heatmap, paths.scatter],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;
    use crate::render::ImageFormat;
    use crate::table::tests::{sample_rows, HEADER};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, header: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join("whr.csv");
        let mut body = format!("{}\n", header);
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        fs::write(&path, body).unwrap();
        path
    }

    fn config_for(input: PathBuf, output_dir: PathBuf) -> EdaConfig {
        EdaConfig {
            input,
            output_dir,
            top_n: 10,
            image_format: ImageFormat::Svg,
        }
    }

    #[test]
    fn full_run_writes_three_artifacts() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let input = write_csv(tmp.path(), HEADER, &sample_rows());
        let out = tmp.path().join("Visualizations");
        fs::create_dir_all(&out)?;

        let summary = run(&config_for(input, out.clone()))?;

        assert_eq!(summary.rows_loaded, 5);
        assert_eq!(summary.rows_ranked, 5);
        assert_eq!(summary.numeric_columns, 7);
        assert_eq!(summary.artifacts.len(), 3);
        for artifact in &summary.artifacts {
            assert!(artifact.exists(), "{} missing", artifact.display());
        }
        assert!(out.join("top10_happiness_bar.svg").exists());
        assert!(out.join("heatmap_corr.svg").exists());
        assert!(out.join("gdp_vs_happiness_plotly.html").exists());
        Ok(())
    }

    #[test]
    fn default_run_writes_png_charts() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let input = write_csv(tmp.path(), HEADER, &sample_rows());
        let out = tmp.path().join("Visualizations");
        fs::create_dir_all(&out)?;
        let config = EdaConfig {
            input,
            output_dir: out.clone(),
            ..EdaConfig::default()
        };

        run(&config)?;

        for name in ["top10_happiness_bar.png", "heatmap_corr.png"] {
            let bytes = fs::read(out.join(name))?;
            assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", name);
        }
        assert!(out.join("gdp_vs_happiness_plotly.html").exists());
        Ok(())
    }

    #[test]
    fn schema_mismatch_writes_nothing() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let header = HEADER.replace(",Generosity", ",Kindness");
        let input = write_csv(tmp.path(), &header, &sample_rows());
        let out = tmp.path().join("out");
        fs::create_dir_all(&out)?;

        let err = run(&config_for(input, out.clone())).unwrap_err();
        match err {
            EdaError::SchemaMismatch { column, .. } => assert_eq!(column, "Generosity"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(fs::read_dir(&out)?.count(), 0);
        Ok(())
    }

    #[test]
    fn missing_output_dir_is_an_output_error() {
        let tmp = tempdir().unwrap();
        let input = write_csv(tmp.path(), HEADER, &sample_rows());
        let err = run(&config_for(input, tmp.path().join("nowhere"))).unwrap_err();
        assert!(matches!(err, EdaError::OutputWrite { .. }), "got {err:?}");
    }

    #[test]
    fn missing_input_is_a_load_error() {
        let tmp = tempdir().unwrap();
        let err = run(&config_for(
            tmp.path().join("absent.csv"),
            tmp.path().to_path_buf(),
        ))
        .unwrap_err();
        assert!(matches!(err, EdaError::DataLoad { .. }));
    }

    #[test]
    fn summary_serializes() -> anyhow::Result<()> {
        let summary = RunSummary {
            rows_loaded: 3,
            rows_ranked: 3,
            numeric_columns: 7,
            artifacts: vec![PathBuf::from("a.svg")],
        };
        let json = serde_json::to_value(&summary)?;
        assert_eq!(json["rows_loaded"], 3);
        assert_eq!(json["artifacts"][0], "a.svg");
        Ok(())
    }
}
