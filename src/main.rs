mod analyzers;
mod chart;
mod config;
mod error;
mod filters;
mod input;
mod logging;
mod pipeline;
mod reporters;
mod risk;
mod scoring;
mod types;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use config::{CcvConfig, ConfigRisk, OUTPUT_FORMATS};
use error::CcvError;
use input::complexity::ComplexityFormat;
use pipeline::Settings;
use risk::RiskThresholds;
use types::{PlotMode, Report, ReportMeta};

const DEFAULT_HTML_OUTPUT: &str = "complexity_churn.html";
const DEFAULT_MIN_COMPLEXITY: u32 = 5;
const DEFAULT_TOP: usize = 20;

#[derive(Parser, Debug)]
#[command(
    name = "ccv",
    about = "Compare code complexity and churn metrics",
    version,
    long_about = "Fuses per-file churn (from `git log --numstat`) with per-function\n\
                  cyclomatic complexity (lizard --csv, lizard --xml or JSON), classifies every file\n\
                  into one of six risk bands by complexity + churn, and renders a\n\
                  scatter chart of the hotspots.\n\n\
                  Example:\n  \
                  git log --numstat --format='COMMIT|%H' > churn.log\n  \
                  lizard --csv src > lizard.csv\n  \
                  ccv churn.log lizard.csv"
)]
struct Args {
    /// `git log --numstat` output.
    #[arg(value_name = "CHURN_FILE", required_unless_present = "generate_config")]
    churn_file: Option<PathBuf>,

    /// lizard --csv or --xml report, or a JSON function report.
    #[arg(value_name = "COMPLEXITY_FILE", required_unless_present = "generate_config")]
    complexity_file: Option<PathBuf>,

    /// Output file. For --format html, defaults to complexity_churn.html
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: terminal, json, html [default: html]
    #[arg(short, long)]
    format: Option<String>,

    /// Y axis: "changes" (lines added + removed) or "commits" [default: changes]
    #[arg(short = 't', long = "plot-type")]
    plot_type: Option<String>,

    /// Ignore functions below this complexity [default: 5]
    #[arg(long)]
    min_complexity: Option<u32>,

    /// Complexity report format: csv, xml or json [default: from file extension]
    #[arg(long)]
    complexity_format: Option<String>,

    /// Rows shown by the terminal report [default: 20]
    #[arg(long)]
    top: Option<usize>,

    #[arg(long = "very-low-risk",  value_name = "N")] very_low_risk:  Option<u32>,
    #[arg(long = "low-risk",       value_name = "N")] low_risk:       Option<u32>,
    #[arg(long = "medium-risk",    value_name = "N")] medium_risk:    Option<u32>,
    #[arg(long = "high-risk",      value_name = "N")] high_risk:      Option<u32>,
    #[arg(long = "very-high-risk", value_name = "N")] very_high_risk: Option<u32>,
    #[arg(long = "critical-risk",  value_name = "N")] critical_risk:  Option<u32>,

    /// YAML config file. CLI flags take precedence over its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print an annotated config template (or write it to PATH) and exit.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,

    #[arg(short, long)]
    verbose: bool,
}

/// CLI flags merged over the config file over built-in defaults.
#[derive(Debug)]
struct Resolved {
    settings: Settings,
    format: String,
    output: Option<PathBuf>,
    complexity_format: Option<ComplexityFormat>,
    top: usize,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if let Some(path) = &args.generate_config {
        config::print_template(path.as_deref())?;
        return Ok(());
    }

    let cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => CcvConfig::default(),
    };
    // Thresholds are validated here, before any input is read
    let resolved = resolve(&args, &cfg)?;
    log::debug!("Resolved settings: {resolved:?}");

    let (Some(churn_path), Some(complexity_path)) = (&args.churn_file, &args.complexity_file) else {
        anyhow::bail!("both CHURN_FILE and COMPLEXITY_FILE are required");
    };

    let report = run_analysis(churn_path, complexity_path, &resolved)?;

    match resolved.format.as_str() {
        "json" => reporters::json::report_json(&report, resolved.output.as_deref())?,
        "terminal" => reporters::terminal::report_terminal(&report, resolved.top),
        _ => {
            let path = resolved.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_HTML_OUTPUT));
            reporters::html::report_html(&report, &path)?;
        }
    }
    Ok(())
}

fn resolve(args: &Args, cfg: &CcvConfig) -> Result<Resolved, CcvError> {
    let format = args
        .format
        .clone()
        .or_else(|| cfg.format.clone())
        .unwrap_or_else(|| "html".to_string());
    if !OUTPUT_FORMATS.contains(&format.as_str()) {
        return Err(CcvError::config(format!(
            "Invalid format \"{format}\". Expected one of: \"terminal\", \"json\", \"html\""
        )));
    }

    let plot_mode = match args.plot_type.as_deref().or(cfg.plot_type.as_deref()) {
        Some(s) => s.parse::<PlotMode>()?,
        None => PlotMode::default(),
    };

    let complexity_format = args
        .complexity_format
        .as_deref()
        .or(cfg.complexity_format.as_deref())
        .map(str::parse::<ComplexityFormat>)
        .transpose()?;

    let top = args.top.or(cfg.top).unwrap_or(DEFAULT_TOP);
    if top == 0 {
        return Err(CcvError::config("--top must be 1 or greater"));
    }

    let from_file = cfg.risk.unwrap_or_default().resolve(RiskThresholds::default());
    let from_cli = ConfigRisk {
        very_low:  args.very_low_risk,
        low:       args.low_risk,
        medium:    args.medium_risk,
        high:      args.high_risk,
        very_high: args.very_high_risk,
        critical:  args.critical_risk,
    };
    let settings = Settings {
        thresholds: from_cli.resolve(from_file),
        min_complexity: args.min_complexity.or(cfg.min_complexity).unwrap_or(DEFAULT_MIN_COMPLEXITY),
        plot_mode,
    };
    settings.validate()?;

    Ok(Resolved {
        settings,
        format,
        output: args.output.clone().or_else(|| cfg.output.as_ref().map(PathBuf::from)),
        complexity_format,
        top,
    })
}

// ── Analysis pipeline ──────────────────────────────────────────────────────────

fn run_analysis(
    churn_path:      &Path,
    complexity_path: &Path,
    resolved:        &Resolved,
) -> anyhow::Result<Report> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));

    let total_start = Instant::now();
    let mut step_start = Instant::now();

    pb.set_message("[1/3] Reading churn data...");
    let churns = input::load_churn(churn_path)
        .inspect_err(|_| pb.finish_and_clear())
        .context("error reading churn data")?;
    let t1 = fmt_dur(step_start.elapsed()); step_start = Instant::now();
    pb.println(format!("  ✓ [1/3] Reading churn data          {t1}"));

    pb.set_message("[2/3] Reading complexity data...");
    let files = input::load_complexity(complexity_path, resolved.complexity_format)
        .inspect_err(|_| pb.finish_and_clear())
        .context("error reading complexity data")?;
    let file_count = files.len();
    let t2 = fmt_dur(step_start.elapsed()); step_start = Instant::now();
    pb.println(format!("  ✓ [2/3] Reading complexity data     {t2}"));

    pb.set_message("[3/3] Fusing and classifying...");
    let settings = &resolved.settings;
    let fused = pipeline::run(files, &churns, settings).inspect_err(|_| pb.finish_and_clear())?;
    let t3 = fmt_dur(step_start.elapsed());
    pb.println(format!("  ✓ [3/3] Fusing and classifying      {t3}"));

    pb.finish_and_clear();
    eprintln!(
        "✔ {} files plotted ({} complexity files, {} churn records) — ⏱ {}",
        fused.entries.len(),
        file_count,
        churns.len(),
        fmt_dur(total_start.elapsed()),
    );

    Ok(Report {
        meta: ReportMeta {
            churn_input: churn_path.display().to_string(),
            complexity_input: complexity_path.display().to_string(),
            plot_mode: settings.plot_mode,
            min_complexity: settings.min_complexity,
            thresholds: settings.thresholds,
            file_count,
            churn_count: churns.len(),
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        },
        entries: fused.entries,
        chart: fused.chart,
    })
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 { format!("{ms}ms") } else { format!("{:.1}s", d.as_secs_f64()) }
}
