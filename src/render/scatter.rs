use crate::error::{EdaError, Result};
use crate::render::ensure_parent_dir;
use crate::table::{finite_value, float_column, string_column};
use arrow::{array::Array, record_batch::RecordBatch};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::{debug, info};

/// plotly.js is loaded from its CDN rather than inlined.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const DIV_ID: &str = "gdp-vs-happiness";
const MISSING_GROUP: &str = "Unknown";

/// Which columns feed which channel of the scatter plot.
#[derive(Debug, Clone, Copy)]
pub struct ScatterColumns<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub color: &'a str,
    pub hover: &'a str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub legendgroup: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub hovertext: Vec<String>,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
struct AxisTitle {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Axis {
    title: AxisTitle,
}

#[derive(Debug, Clone, Serialize)]
struct Layout {
    title: AxisTitle,
    xaxis: Axis,
    yaxis: Axis,
    legend: Legend,
}

#[derive(Debug, Clone, Serialize)]
struct Legend {
    title: AxisTitle,
}

/// Group rows into one trace per colour value, in first-appearance order.
/// Rows missing either coordinate are left out.
pub fn build_traces(batch: &RecordBatch, cols: ScatterColumns<'_>) -> Result<Vec<Trace>> {
    let xs = float_column(batch, cols.x)?;
    let ys = float_column(batch, cols.y)?;
    let groups = string_column(batch, cols.color)?;
    let hover = string_column(batch, cols.hover)?;

    let template = format!(
        "<b>%{{hovertext}}</b><br><br>{}=%{{x}}<br>{}=%{{y}}<extra></extra>",
        cols.x, cols.y
    );

    let mut traces: Vec<Trace> = Vec::new();
    let mut skipped = 0usize;
    for i in 0..batch.num_rows() {
        let (Some(x), Some(y)) = (finite_value(xs, i), finite_value(ys, i)) else {
            skipped += 1;
            continue;
        };
        let group = if groups.is_null(i) {
            MISSING_GROUP
        } else {
            groups.value(i)
        };
        let label = if hover.is_null(i) { "" } else { hover.value(i) };

        let pos = match traces.iter().position(|t| t.name == group) {
            Some(pos) => pos,
            None => {
                traces.push(Trace {
                    kind: "scatter",
                    mode: "markers",
                    name: group.to_string(),
                    legendgroup: group.to_string(),
                    x: Vec::new(),
                    y: Vec::new(),
                    hovertext: Vec::new(),
                    hovertemplate: template.clone(),
                });
                traces.len() - 1
            }
        };
        let trace = &mut traces[pos];
        trace.x.push(x);
        trace.y.push(y);
        trace.hovertext.push(label.to_string());
    }

    debug!(traces = traces.len(), skipped, "grouped scatter points");
    Ok(traces)
}

/// Serialize for embedding inside a `<script>` block.
fn script_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// A complete HTML page for `traces` that pulls plotly.js from the CDN.
pub fn scatter_html(
    traces: &[Trace],
    cols: ScatterColumns<'_>,
    title: &str,
) -> serde_json::Result<String> {
    let layout = Layout {
        title: AxisTitle {
            text: title.to_string(),
        },
        xaxis: Axis {
            title: AxisTitle {
                text: cols.x.to_string(),
            },
        },
        yaxis: Axis {
            title: AxisTitle {
                text: cols.y.to_string(),
            },
        },
        legend: Legend {
            title: AxisTitle {
                text: cols.color.to_string(),
            },
        },
    };
    let data = script_json(&traces)?;
    let layout = script_json(&layout)?;

    Ok(format!(
        r#"<html>
<head><meta charset="utf-8" /></head>
<body>
    <div>
        <script src="{cdn}" charset="utf-8"></script>
        <div id="{id}" class="plotly-graph-div" style="height:100%; width:100%;"></div>
        <script type="text/javascript">
            window.PLOTLYENV = window.PLOTLYENV || {{}};
            if (document.getElementById("{id}")) {{
                Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});
            }};
        </script>
    </div>
</body>
</html>
"#,
        cdn = PLOTLY_CDN,
        id = DIV_ID,
        data = data,
        layout = layout,
    ))
}

/// Write the interactive scatter plot of `batch` to `path`.
#[tracing::instrument(level = "info", skip(batch, cols, title), fields(path = %path.display()))]
pub fn render_scatter(
    batch: &RecordBatch,
    cols: ScatterColumns<'_>,
    title: &str,
    path: &Path,
) -> Result<()> {
    let traces = build_traces(batch, cols)?;
    let html = scatter_html(&traces, cols, title).map_err(|e| EdaError::output_write(path, e))?;
    ensure_parent_dir(path)?;
    fs::write(path, html).map_err(|e| EdaError::output_write(path, e))?;
    info!(
        points = traces.iter().map(|t| t.x.len()).sum::<usize>(),
        "wrote scatter page"
    );
    Ok(())
}
