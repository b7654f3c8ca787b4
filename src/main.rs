use anyhow::{Context, Result};
use clap::Parser;
use happiness_eda::{pipeline, render::ImageFormat, EdaConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Exploratory charts for the World Happiness Report"
)]
struct Args {
    /// YAML file with run settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Survey CSV to load
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Directory the charts are written into (must exist)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Number of countries in the bar chart
    #[arg(long)]
    top_n: Option<usize>,
    /// Format of the static charts
    #[arg(long, value_enum)]
    image_format: Option<ImageFormat>,
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut EdaConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(format) = self.image_format {
            config.image_format = format;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let default_level = if args.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) resolve settings ─────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => EdaConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EdaConfig::default(),
    };
    args.apply(&mut config);
    info!(
        input = %config.input.display(),
        output_dir = %config.output_dir.display(),
        top_n = config.top_n,
        format = ?config.image_format,
        "settings"
    );

    // ─── 3) load, project, render ────────────────────────────────────
    let summary = pipeline::run(&config).context("happiness analysis failed")?;
    for artifact in &summary.artifacts {
        info!(path = %artifact.display(), "wrote");
    }
    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    info!("all done");
    Ok(())
}
