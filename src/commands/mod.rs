pub mod run;
pub mod scc;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub fn open_script(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open script: {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Reads the first line of a script, without its line terminator.
pub fn read_header(path: &Path) -> Result<String> {
    let mut header = String::new();
    open_script(path)?
        .read_line(&mut header)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    Ok(header.trim_end_matches(['\r', '\n']).to_string())
}
