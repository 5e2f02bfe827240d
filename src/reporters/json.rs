use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CcvError, Result};
use crate::types::Report;

/// Outputs the report as JSON. Writes to a file if given, otherwise stdout.
pub fn report_json(report: &Report, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let file = File::create(path).map_err(|e| CcvError::io(path, e))?;
        write_json(report, BufWriter::new(file)).map_err(|e| CcvError::io(path, e))?;
        eprintln!("✓ JSON report written to {}", path.display());
    } else {
        let stdout = std::io::stdout();
        write_json(report, BufWriter::new(stdout.lock())).map_err(|e| CcvError::io("<stdout>", e))?;
    }
    Ok(())
}

fn write_json<W: Write>(report: &Report, mut writer: W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()
}
