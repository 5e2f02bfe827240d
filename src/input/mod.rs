pub mod churn;
pub mod complexity;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CcvError, Result};
use crate::types::{ChurnRecord, FileRecord};
use complexity::ComplexityFormat;

pub fn load_churn(path: &Path) -> Result<Vec<ChurnRecord>> {
    let file = File::open(path).map_err(|e| CcvError::io(path, e))?;
    churn::read_churn(BufReader::new(file))
}

pub fn load_complexity(path: &Path, format: Option<ComplexityFormat>) -> Result<Vec<FileRecord>> {
    let format = format.unwrap_or_else(|| ComplexityFormat::from_path(path));
    let file = File::open(path).map_err(|e| CcvError::io(path, e))?;
    complexity::read_complexity(BufReader::new(file), format)
}
