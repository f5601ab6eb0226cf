//! Rendering of plugin output

use std::io::{self, Write};

use mosaic_binder::Diagnostics;
use mosaic_plugins::LoadReport;

/// Print the decoded configuration, then the field trace when asked for
pub fn write_config(out: &mut impl Write, report: &LoadReport, with_trace: bool) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &report.config)?;
    writeln!(out)?;

    if with_trace && !report.trace.is_empty() {
        writeln!(out)?;
        for (path, entry) in report.trace.iter() {
            writeln!(out, "{path}\t{}\t{}", entry.position, entry.annotation)?;
        }
    }

    Ok(())
}

/// Print failures and warnings grouped by severity
pub fn write_summary(out: &mut impl Write, diagnostics: &Diagnostics) -> io::Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", diagnostics.summary())
}

/// Process exit status: 1 when any failure was reported, warnings alone pass
pub fn exit_status(diagnostics: &Diagnostics) -> u8 {
    u8::from(diagnostics.has_failures())
}
