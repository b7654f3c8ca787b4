//! Exploratory charts for the World Happiness Report.
//!
//! Loads the survey CSV, keeps a fixed set of columns, and writes a top-N
//! bar chart, a correlation heatmap and an interactive GDP/happiness
//! scatter page.

pub mod config;
pub mod error;
pub mod load;
pub mod pipeline;
pub mod render;
pub mod table;

pub use config::EdaConfig;
pub use error::{EdaError, Result};
pub use pipeline::{run, RunSummary};
