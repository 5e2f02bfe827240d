use crate::types::{FileRecord, FunctionRecord};

/// Anything that maps a file collection to a filtered file collection.
pub trait FilesFilter {
    fn filter(&self, files: Vec<FileRecord>) -> Vec<FileRecord>;
}

impl<F> FilesFilter for F
where
    F: Fn(Vec<FileRecord>) -> Vec<FileRecord>,
{
    fn filter(&self, files: Vec<FileRecord>) -> Vec<FileRecord> {
        self(files)
    }
}

/// Keeps functions with complexity >= `min_complexity`.
/// Files left without any function are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityFilter {
    pub min_complexity: u32,
}

impl ComplexityFilter {
    pub fn new(min_complexity: u32) -> Self {
        ComplexityFilter { min_complexity }
    }
}

impl FilesFilter for ComplexityFilter {
    fn filter(&self, files: Vec<FileRecord>) -> Vec<FileRecord> {
        files
            .into_iter()
            .filter_map(|file| {
                let functions: Vec<FunctionRecord> = file
                    .functions
                    .into_iter()
                    .filter(|f| f.complexity >= self.min_complexity)
                    .collect();
                if functions.is_empty() {
                    None
                } else {
                    Some(FileRecord { path: file.path, functions })
                }
            })
            .collect()
    }
}

/// Runs each filter on the output of the previous one.
pub fn apply_filters(files: Vec<FileRecord>, filters: &[&dyn FilesFilter]) -> Vec<FileRecord> {
    filters.iter().fold(files, |acc, f| f.filter(acc))
}
