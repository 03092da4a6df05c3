//! Timing report output

use anyhow::{Context, Result};
use skin_core::StatsReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the report as pretty-printed JSON
pub fn write_stats(path: &Path, report: &StatsReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create stats output: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to serialize stats: {:?}", path))?;
    writeln!(writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write stats: {:?}", path))?;

    tracing::debug!("Wrote {} stage timings to {:?}", report.stages.len(), path);
    Ok(())
}
