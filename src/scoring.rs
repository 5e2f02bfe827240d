use crate::risk::{RiskBand, RiskLevel, RiskThresholds};
use crate::types::{ChartEntry, ClassifiedEntry};

/// Maps a score to the first band (lowest first) whose range contains it.
/// Scores below the lowest band's minimum are clamped into the lowest band.
pub fn classify(score: f64, bands: &[RiskBand]) -> RiskLevel {
    bands
        .iter()
        .find(|band| band.contains(score))
        .or_else(|| bands.first())
        .map_or(RiskLevel::VeryLow, |band| band.level)
}

/// Scores every entry as `complexity + churn` and assigns its risk level.
pub fn classify_entries(entries: Vec<ChartEntry>, thresholds: &RiskThresholds) -> Vec<ClassifiedEntry> {
    let bands = thresholds.bands();
    entries.into_iter().map(|entry| {
        let score = entry.score();
        let level = classify(score, &bands);
        ClassifiedEntry { entry, score, level }
    }).collect()
}
