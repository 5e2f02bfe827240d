use std::fs;
use std::path::Path;

use serde_json::json;

use crate::error::{CcvError, Result};
use crate::types::{BandSeries, ClassifiedEntry, Report, ReportMeta};

pub fn report_html(report: &Report, output_file: &Path) -> Result<()> {
    let html = build_html(report);
    fs::write(output_file, &html).map_err(|e| CcvError::io(output_file, e))?;
    eprintln!("✓ Chart written to {}", output_file.display());
    Ok(())
}

/// One Chart.js dataset per band. Each point carries its merged file list for
/// the tooltip.
fn datasets(series: &[BandSeries]) -> serde_json::Value {
    series
        .iter()
        .map(|s| {
            let data: Vec<serde_json::Value> = s
                .points
                .iter()
                .map(|p| json!({ "x": p.complexity, "y": p.churn, "files": p.file_list("<br/>") }))
                .collect();
            json!({
                "label": s.name,
                "data": data,
                "backgroundColor": s.color,
                "borderColor": s.color,
                "pointRadius": 5,
                "pointHoverRadius": 7,
            })
        })
        .collect()
}

fn build_html(report: &Report) -> String {
    let chart = &report.chart;
    let meta = &report.meta;

    // Escaped JSON embedded in a <script> block
    let datasets = datasets(&chart.series).to_string().replace("</", "<\\/");

    let legend: String = chart.series.iter().map(|s| format!(
        r#"<div class="stat" style="border-color:{color}"><div class="stat-label">{name}</div><div class="stat-value" style="color:{color}">{count}</div><div class="range">{range}</div></div>"#,
        color = s.color,
        name = esc(s.name),
        count = s.file_count(),
        range = band_range(meta, s),
    )).collect();

    let mut ranked: Vec<&ClassifiedEntry> = report.entries.iter().collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    let table_rows: String = ranked.iter().take(50).enumerate().map(|(i, e)| format!(
        "<tr><td class=\"num\">{}</td><td class=\"path\">{}</td><td class=\"num\">{:.1}</td>\
         <td class=\"num\">{}</td><td class=\"num\"><strong>{:.1}</strong></td>\
         <td><span class=\"badge\" style=\"background:{}\">{}</span></td></tr>",
        i + 1, esc(&e.entry.file), e.entry.complexity, e.entry.churn, e.score,
        e.level.color(), esc(e.level.name()),
    )).collect();

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8"><meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js"></script>
  <style>
    *,*::before,*::after{{box-sizing:border-box;margin:0;padding:0}}
    body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#0f172a;color:#e2e8f0;padding:2rem;font-size:14px;line-height:1.6}}
    h1{{font-size:1.75rem;font-weight:800}}
    h2{{font-size:1rem;font-weight:700;color:#94a3b8;text-transform:uppercase;letter-spacing:.06em;margin-bottom:1rem}}
    .meta{{color:#64748b;margin:.4rem 0 2rem;font-size:.8rem}} .meta span{{margin-right:1.5rem}}
    .stats{{display:grid;grid-template-columns:repeat(auto-fit,minmax(150px,1fr));gap:1rem;margin-bottom:1.5rem}}
    .stat{{background:#1e293b;border:1px solid #334155;border-left-width:4px;border-radius:.625rem;padding:1rem 1.25rem}}
    .stat-label{{font-size:.7rem;text-transform:uppercase;letter-spacing:.06em;color:#64748b}}
    .stat-value{{font-size:2rem;font-weight:800;margin-top:.2rem}}
    .range{{font-size:.75rem;color:#64748b}}
    .card{{background:#1e293b;border:1px solid #334155;border-radius:.75rem;padding:1.5rem;margin-bottom:1.5rem}}
    .chart-wrap{{position:relative;width:1200px;max-width:100%;height:800px}}
    table{{width:100%;border-collapse:collapse}}
    th{{text-align:left;padding:.5rem .75rem;border-bottom:2px solid #334155;font-size:.7rem;font-weight:700;text-transform:uppercase;letter-spacing:.06em;color:#64748b}}
    td{{padding:.5rem .75rem;border-bottom:1px solid #1a2744;vertical-align:middle}}
    tr:last-child td{{border-bottom:none}} tr:hover td{{background:#162032}}
    td.path{{font-family:'JetBrains Mono','Fira Code',ui-monospace,monospace;font-size:.78rem;color:#7dd3fc;word-break:break-all}}
    td.num{{text-align:right;color:#94a3b8}}
    .badge{{display:inline-block;padding:.15rem .5rem;border-radius:999px;font-size:.7rem;font-weight:700;color:#0f172a;white-space:nowrap}}
    .footer{{text-align:center;color:#334155;font-size:.75rem;margin-top:2rem}}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p class="meta">
    <span>Churn: <strong>{churn_input}</strong></span>
    <span>Complexity: <strong>{complexity_input}</strong></span>
    <span>Y axis: <strong>{plot_mode}</strong></span>
    <span>Min complexity: <strong>{min_complexity}</strong></span>
    <span>Files plotted: <strong>{plotted}</strong></span>
  </p>
  <div class="stats">{legend}</div>
  <div class="card"><div class="chart-wrap"><canvas id="chart"></canvas></div></div>
  <div class="card">
    <h2>Top Hotspots</h2>
    <table>
      <thead><tr><th>#</th><th>File</th><th style="text-align:right">{x_label}</th><th style="text-align:right">{y_label}</th>
      <th style="text-align:right">Score</th><th>Risk</th></tr></thead>
      <tbody>{table_rows}</tbody>
    </table>
  </div>
  <p class="footer">Generated by ccv on {now}</p>
  <script>
    new Chart(document.getElementById('chart'), {{
      type: 'scatter',
      data: {{ datasets: {datasets} }},
      options: {{
        responsive: true, maintainAspectRatio: false,
        plugins: {{
          title: {{ display: true, text: {title_js}, color: '#e2e8f0' }},
          legend: {{ labels: {{ color: '#94a3b8' }} }},
          tooltip: {{ callbacks: {{ label: ctx => [
            'Complexity: ' + ctx.raw.x,
            'Churn: ' + ctx.raw.y,
            'Files:',
            ...ctx.raw.files.split('<br/>')
          ] }} }}
        }},
        scales: {{
          x: {{ title: {{ display: true, text: {x_label_js}, color: '#94a3b8' }}, ticks: {{ color: '#64748b' }}, grid: {{ color: '#1e2d47' }} }},
          y: {{ title: {{ display: true, text: {y_label_js}, color: '#94a3b8' }}, ticks: {{ color: '#64748b' }}, grid: {{ color: '#1e2d47' }} }}
        }}
      }}
    }});
  </script>
</body>
</html>"#,
        title = esc(chart.title),
        title_js = json!(chart.title),
        x_label = esc(chart.x_label),
        y_label = esc(chart.y_label),
        x_label_js = json!(chart.x_label),
        y_label_js = json!(chart.y_label),
        churn_input = esc(&meta.churn_input),
        complexity_input = esc(&meta.complexity_input),
        plot_mode = meta.plot_mode,
        min_complexity = meta.min_complexity,
        plotted = report.entries.len(),
        legend = legend,
        table_rows = table_rows,
        datasets = datasets,
        now = now,
    )
}

fn band_range(meta: &ReportMeta, series: &BandSeries) -> String {
    meta.thresholds
        .bands()
        .into_iter()
        .find(|b| b.level == series.level)
        .map(|b| match b.max {
            Some(max) => format!("{}–{}", b.min, max),
            None => format!("≥ {}", b.min),
        })
        .unwrap_or_default()
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
