use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

lazy_static! {
    // How the required repeat count is encoded in document names.
    static ref RE_REPEATS: Regex = Regex::new(r"repeats=(\d+)").expect("valid regex");
}

/// Extract the required repeat count from a document name like
/// `corpus/part1.repeats=5.txt`. Returns `None` when the pattern is absent
/// or the count is not a positive integer.
pub fn required_repeats(name: &str) -> Option<u32> {
    RE_REPEATS
        .captures(name)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|&n| n > 0)
}

/// One document to be indexed: path, required repeat count, byte size.
#[derive(Debug, Clone)]
pub struct DocSpec {
    pub path: PathBuf,
    pub required: u32,
    pub size: u64,
}

impl DocSpec {
    /// Average size of one repeat. Smaller repeat sizes are more selective,
    /// so documents are ingested in ascending order of this value.
    pub fn repeat_size(&self) -> f64 {
        self.size as f64 / self.required as f64
    }
}

/// Parse file-list text: one document path per line, `#` starts an
/// end-of-line comment, blank and comment-only lines are ignored.
pub fn parse_file_list(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in text.lines() {
        let code = match line.split_once('#') {
            Some((code, comment)) => {
                let comment = comment.trim();
                if !comment.is_empty() {
                    tracing::debug!(comment, "file list comment");
                }
                code
            }
            None => line,
        };
        let code = code.trim();
        if !code.is_empty() {
            names.push(code.to_string());
        }
    }
    names
}

/// Read and parse a file list from disk.
pub fn read_file_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_file_list(&text))
}

/// Stat each named document and pair it with its required repeat count.
/// Names without a `repeats=<N>` marker are reported and skipped; a stat
/// failure aborts.
pub fn collect_documents(names: &[String]) -> Result<Vec<DocSpec>> {
    let mut specs = Vec::with_capacity(names.len());
    for name in names {
        let Some(required) = required_repeats(name) else {
            tracing::warn!(file = %name, "file name does not encode repeats=<N>, skipping");
            continue;
        };
        let path = PathBuf::from(name);
        let meta = fs::metadata(&path).map_err(|source| Error::Stat {
            path: path.clone(),
            source,
        })?;
        specs.push(DocSpec {
            path,
            required,
            size: meta.len(),
        });
    }
    Ok(specs)
}
