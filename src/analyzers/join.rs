use std::collections::HashMap;
use crate::types::{AggregatedFile, ChartEntry, ChurnRecord, PlotMode};

/// Matches per-file complexity against churn by exact path.
/// Driven by the complexity side: files without churn are dropped and
/// churn-only paths are never visited.
pub fn join_metrics(
    files:  &[AggregatedFile],
    churns: &[ChurnRecord],
    mode:   PlotMode,
) -> Vec<ChartEntry> {
    // Duplicate paths in the churn input: last record wins
    let churn_map: HashMap<&str, &ChurnRecord> =
        churns.iter().map(|c| (c.path.as_str(), c)).collect();

    files.iter().filter_map(|fc| {
        let Some(churn) = churn_map.get(fc.path.as_str()) else {
            log::debug!("No churn data for {}, skipping", fc.path);
            return None;
        };
        let value = match mode {
            PlotMode::Commits => churn.commits,
            PlotMode::Changes => churn.churn,
        };
        Some(ChartEntry { file: fc.path.clone(), complexity: fc.complexity, churn: value })
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(path: &str, complexity: f64) -> AggregatedFile {
        AggregatedFile { path: path.to_string(), complexity }
    }

    fn churn(path: &str, churn: u64, commits: u64) -> ChurnRecord {
        ChurnRecord { path: path.to_string(), churn, added: churn, removed: 0, commits }
    }

    fn fixture() -> (Vec<AggregatedFile>, Vec<ChurnRecord>) {
        (
            vec![agg("a", 1.0), agg("b", 2.0), agg("c", 3.0)],
            vec![churn("b", 40, 4), churn("c", 90, 9), churn("d", 10, 1)],
        )
    }

    #[test]
    fn test_join_keeps_only_shared_paths() {
        let (files, churns) = fixture();
        let got = join_metrics(&files, &churns, PlotMode::Changes);
        let paths: Vec<&str> = got.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(paths, vec!["b", "c"]);
    }

    #[test]
    fn test_changes_mode_uses_line_churn() {
        let (files, churns) = fixture();
        let got = join_metrics(&files, &churns, PlotMode::Changes);
        assert_eq!(got[0], ChartEntry { file: "b".into(), complexity: 2.0, churn: 40 });
        assert_eq!(got[1], ChartEntry { file: "c".into(), complexity: 3.0, churn: 90 });
    }

    #[test]
    fn test_commits_mode_uses_commit_count() {
        let (files, churns) = fixture();
        let got = join_metrics(&files, &churns, PlotMode::Commits);
        assert_eq!(got[0].churn, 4);
        assert_eq!(got[1].churn, 9);
    }

    #[test]
    fn test_path_match_is_exact() {
        let files = vec![agg("src/a.c", 1.0)];
        let churns = vec![churn("./src/a.c", 5, 1), churn("SRC/A.C", 5, 1)];
        assert!(join_metrics(&files, &churns, PlotMode::Changes).is_empty());
    }

    #[test]
    fn test_duplicate_churn_path_last_wins() {
        let files = vec![agg("a", 1.0)];
        let churns = vec![churn("a", 5, 1), churn("a", 7, 2)];
        assert_eq!(join_metrics(&files, &churns, PlotMode::Changes)[0].churn, 7);
    }
}
