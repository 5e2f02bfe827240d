use crate::types::{AggregatedFile, FileRecord};

/// Average complexity per file: sum(function complexity) / function count.
/// Files without functions are skipped.
pub fn average_complexity(files: &[FileRecord]) -> Vec<AggregatedFile> {
    files
        .iter()
        .filter(|file| !file.functions.is_empty())
        .map(|file| {
            let total: f64 = file.functions.iter().map(|f| f64::from(f.complexity)).sum();
            let complexity = total / file.functions.len() as f64;
            log::debug!("File: {}, Complexity: {complexity:.2}", file.path);
            AggregatedFile { path: file.path.clone(), complexity }
        })
        .collect()
}
