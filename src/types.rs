use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CcvError;
use crate::risk::{RiskLevel, RiskThresholds};

// ─── Complexity Input ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub complexity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
}

// ─── Churn Input ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChurnRecord {
    pub path: String,
    /// Lines added + removed.
    pub churn: u64,
    pub added: u64,
    pub removed: u64,
    pub commits: u64,
}

// ─── Fusion ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedFile {
    pub path: String,
    pub complexity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub file: String,
    pub complexity: f64,
    pub churn: u64,
}

impl ChartEntry {
    pub fn score(&self) -> f64 {
        self.complexity + self.churn as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedEntry {
    #[serde(flatten)]
    pub entry: ChartEntry,
    pub score: f64,
    pub level: RiskLevel,
}

/// Which churn measure is plotted on the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Number of commits touching the file.
    Commits,
    /// Lines added + removed.
    #[default]
    Changes,
}

impl FromStr for PlotMode {
    type Err = CcvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commits" => Ok(PlotMode::Commits),
            "changes" => Ok(PlotMode::Changes),
            _ => Err(CcvError::UnrecognizedPlotMode { value: s.to_string() }),
        }
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotMode::Commits => write!(f, "commits"),
            PlotMode::Changes => write!(f, "changes"),
        }
    }
}

// ─── Chart ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub complexity: f64,
    pub churn: u64,
    pub files: Vec<String>,
    pub color: &'static str,
}

impl ChartPoint {
    pub fn file_list(&self, sep: &str) -> String {
        self.files.join(sep)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSeries {
    pub level: RiskLevel,
    pub name: &'static str,
    pub color: &'static str,
    pub points: Vec<ChartPoint>,
}

impl BandSeries {
    pub fn file_count(&self) -> usize {
        self.points.iter().map(|p| p.files.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<BandSeries>,
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub churn_input: String,
    pub complexity_input: String,
    pub plot_mode: PlotMode,
    pub min_complexity: u32,
    pub thresholds: RiskThresholds,
    pub file_count: usize,
    pub churn_count: usize,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub entries: Vec<ClassifiedEntry>,
    pub chart: ChartData,
}
