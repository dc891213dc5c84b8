//! HTML chart writer
//!
//! Renders one static HTML file per transport group (`http`, `ws`), each
//! with a Chart.js line chart: one series per provider, x = call-rate,
//! y = median latency. Providers are assigned to groups by a substring
//! match on their name, which follows the `{network}_{vendor}_{transport}`
//! naming convention of the endpoint variables.

use super::ResultsTable;
use crate::error::{AppError, Result};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const SERIES_COLORS: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Writes `{network}_{timestamp}_{group}_chart.html` files
pub struct ChartWriter {
    output_dir: PathBuf,
}

impl ChartWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Write both transport-group charts and return their paths. A group
    /// with no providers still gets a chart file with empty series.
    pub fn write(&self, network: &str, timestamp: &str, table: &ResultsTable) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            AppError::report(format!(
                "failed to create output directory '{}': {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for group in ["http", "ws"] {
            let path = self
                .output_dir
                .join(format!("{}_{}_{}_chart.html", network, timestamp, group));
            let html = render_group(network, group, table);
            fs::write(&path, html).map_err(|e| {
                AppError::report(format!("failed to write '{}': {}", path.display(), e))
            })?;
            paths.push(path);
        }
        Ok(paths)
    }
}

/// Whether a provider name belongs to a transport group. The `_ws` check
/// runs first so `_ws` names never fall into the http group by accident.
fn group_of(provider: &str) -> &'static str {
    if provider.contains("_ws") {
        "ws"
    } else {
        "http"
    }
}

fn render_group(network: &str, group: &str, table: &ResultsTable) -> String {
    let providers: Vec<&str> = table
        .providers()
        .into_iter()
        .filter(|p| group_of(p) == group)
        .collect();

    let datasets: Vec<serde_json::Value> = providers
        .iter()
        .enumerate()
        .map(|(i, provider)| {
            let points: Vec<serde_json::Value> = table
                .iter()
                .filter(|(key, _)| key.provider == *provider)
                .map(|(key, summary)| json!({ "x": key.rate, "y": summary.median }))
                .collect();
            json!({
                "label": provider,
                "data": points,
                "borderColor": SERIES_COLORS[i % SERIES_COLORS.len()],
                "fill": false,
                "tension": 0.1,
            })
        })
        .collect();

    let title = format!("{} median eth_call latency ({})", network, group);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
</head>
<body>
<canvas id="latency-chart"></canvas>
<script>
new Chart(document.getElementById('latency-chart'), {{
  type: 'line',
  data: {{ datasets: {datasets} }},
  options: {{
    plugins: {{ title: {{ display: true, text: {title_json} }} }},
    scales: {{
      x: {{ type: 'linear', title: {{ display: true, text: 'calls per second' }} }},
      y: {{ title: {{ display: true, text: 'median latency (ms)' }} }}
    }}
  }}
}});
</script>
</body>
</html>
"#,
        title = title,
        title_json = json!(title),
        datasets = serde_json::Value::Array(datasets),
    )
}
