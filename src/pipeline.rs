use crate::analyzers::{aggregate, join};
use crate::chart;
use crate::error::Result;
use crate::filters::{apply_filters, ComplexityFilter};
use crate::risk::RiskThresholds;
use crate::scoring;
use crate::types::{ChartData, ChurnRecord, ClassifiedEntry, FileRecord, PlotMode};

/// Everything the fusion stages need, resolved once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub thresholds: RiskThresholds,
    pub min_complexity: u32,
    pub plot_mode: PlotMode,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            thresholds: RiskThresholds::default(),
            min_complexity: 5,
            plot_mode: PlotMode::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}

#[derive(Debug, Clone)]
pub struct Fused {
    pub entries: Vec<ClassifiedEntry>,
    pub chart: ChartData,
}

/// Filter → aggregate → join → classify → assemble.
pub fn run(files: Vec<FileRecord>, churns: &[ChurnRecord], settings: &Settings) -> Result<Fused> {
    settings.validate()?;

    let input_files = files.len();
    let filtered = apply_filters(files, &[&ComplexityFilter::new(settings.min_complexity)]);
    log::debug!(
        "{} of {input_files} files have functions with complexity >= {}",
        filtered.len(),
        settings.min_complexity
    );

    let averages = aggregate::average_complexity(&filtered);
    let entries = join::join_metrics(&averages, churns, settings.plot_mode);
    log::info!(
        "Matched {} of {} files against {} churn records",
        entries.len(),
        averages.len(),
        churns.len()
    );

    let classified = scoring::classify_entries(entries, &settings.thresholds);
    let chart = chart::assemble(&classified, &settings.thresholds);
    Ok(Fused { entries: classified, chart })
}
