use std::collections::HashMap;

use crate::risk::{RiskLevel, RiskThresholds};
use crate::types::{BandSeries, ChartData, ChartPoint, ClassifiedEntry};

pub const CHART_TITLE: &str = "Code Complexity vs Churn";
pub const X_LABEL: &str = "Complexity";
pub const Y_LABEL: &str = "Churn";

/// Groups classified entries into one series per band. Entries of the same
/// band sharing exactly the same (complexity, churn) merge into one point.
pub fn assemble(entries: &[ClassifiedEntry], thresholds: &RiskThresholds) -> ChartData {
    let mut series: Vec<BandSeries> = thresholds
        .bands()
        .iter()
        .map(|band| BandSeries {
            level: band.level,
            name: band.name(),
            color: band.color(),
            points: Vec::new(),
        })
        .collect();

    // (level, complexity bits, churn) → index into that band's points
    let mut index: HashMap<(RiskLevel, u64, u64), usize> = HashMap::new();

    for ce in entries {
        let Some(band) = series.iter_mut().find(|s| s.level == ce.level) else { continue };
        let key = (ce.level, ce.entry.complexity.to_bits(), ce.entry.churn);
        match index.get(&key) {
            Some(&i) => band.points[i].files.push(ce.entry.file.clone()),
            None => {
                index.insert(key, band.points.len());
                band.points.push(ChartPoint {
                    complexity: ce.entry.complexity,
                    churn: ce.entry.churn,
                    files: vec![ce.entry.file.clone()],
                    color: band.color,
                });
            }
        }
    }

    ChartData { title: CHART_TITLE, x_label: X_LABEL, y_label: Y_LABEL, series }
}
