use std::collections::HashMap;
use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CcvError, InputSource, Result};
use crate::types::ChurnRecord;

static RENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]* => ([^}]*)\}").expect("rename pattern is valid"));

/// Reads `git log --numstat` output and folds it into one record per path.
///
/// Lines of the form `added<TAB>removed<TAB>path` are numstat entries; any
/// other non-blank line starts a new commit. Binary entries (`-	-`) count as
/// zero lines but still count the commit. Records come back in first-seen order.
pub fn read_churn<R: BufRead>(reader: R) -> Result<Vec<ChurnRecord>> {
    let mut records: Vec<ChurnRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    // Commit id of the last commit each record was counted for
    let mut last_commit: Vec<usize> = Vec::new();
    let mut commit: usize = 0;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| {
            CcvError::parse(InputSource::Churn, Some(line_no), format!("cannot read line: {e}"))
        })?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() {
            continue;
        }

        let Some((added, removed, raw_name)) = split_numstat(trimmed) else {
            commit += 1;
            continue;
        };
        let added = parse_count(added, line_no)?;
        let removed = parse_count(removed, line_no)?;
        let Some(path) = normalize_filename(raw_name) else {
            return Err(CcvError::parse(
                InputSource::Churn,
                Some(line_no),
                format!("cannot resolve file name \"{raw_name}\""),
            ));
        };

        let slot = *index.entry(path.clone()).or_insert_with(|| {
            records.push(ChurnRecord { path, ..ChurnRecord::default() });
            // usize::MAX never matches a real commit id
            last_commit.push(usize::MAX);
            records.len() - 1
        });
        let record = &mut records[slot];
        record.added += added;
        record.removed += removed;
        record.churn = record.added + record.removed;
        if last_commit[slot] != commit {
            last_commit[slot] = commit;
            record.commits += 1;
        }
    }

    log::debug!("Read {} churn records", records.len());
    Ok(records)
}

/// Splits a numstat line. Returns `None` when the line is not shaped like one
/// (i.e. it is a commit header). Only the added count decides the shape, so
/// `12<TAB>oops<TAB>a.rs` is still numstat and fails on the removed count.
fn split_numstat(line: &str) -> Option<(&str, &str, &str)> {
    let mut parts = line.splitn(3, '\t');
    let (added, removed, name) = (parts.next()?, parts.next()?, parts.next()?);
    if is_count(added) && !name.trim().is_empty() {
        Some((added, removed, name))
    } else {
        None
    }
}

fn is_count(s: &str) -> bool {
    s == "-" || (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_count(raw: &str, line_no: usize) -> Result<u64> {
    if raw == "-" {
        return Ok(0);
    }
    raw.parse().map_err(|_| {
        CcvError::parse(InputSource::Churn, Some(line_no), format!("invalid line count \"{raw}\""))
    })
}

/// Resolves git rename notations to the new path:
///   "src/{old => new}/file.js" → "src/new/file.js"
///   "old-name => new-name"     → "new-name"
fn normalize_filename(raw: &str) -> Option<String> {
    if raw.contains('{') && raw.contains("=>") {
        let result = RENAME_RE.replace(raw, "$1").replace("//", "/");
        return if result.contains('{') { None } else { Some(result.trim().to_string()) };
    }
    if raw.contains(" => ") {
        return raw.split(" => ").last().map(|s| s.trim().to_string());
    }
    let t = raw.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}
