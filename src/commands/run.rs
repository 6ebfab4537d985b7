use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use digraph_scc::config::Config;
use digraph_scc::script::ScriptRunner;

pub fn run(input: &Path, output: Option<&Path>, config: Config) -> Result<()> {
    let reader = super::open_script(input)?;
    let runner = ScriptRunner::new(config);

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create transcript: {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = runner
        .run(reader, &mut out)
        .with_context(|| format!("Failed to run script: {}", input.display()))?;
    out.flush().context("Failed to flush transcript")?;

    log::info!(
        "{}: {} commands executed, {} lines rejected",
        input.display(),
        summary.executed,
        summary.rejected
    );
    Ok(())
}
