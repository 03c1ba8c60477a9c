use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render response")?;
    println!("{rendered}");
    Ok(())
}

/// Progress line for `upload`, redrawn in place on stderr.
pub fn progress_line(percent: u8) {
    if let Err(err) = draw_progress(percent) {
        debug!(error = %err, "failed to draw upload progress");
    }
}

fn draw_progress(percent: u8) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "\rUploading... {percent:>3}%")?;
    if percent >= 100 {
        writeln!(stderr)?;
    }
    stderr.flush()
}
