use anyhow::Context;
use tracebuf_core::{
    Sample,
    render::{render_json, render_raw, render_table},
};

use crate::cli::OutputFormat;

/// Renders samples the same way the target's dump functions would.
/// JSON output gets a trailing newline so it ends the line on a terminal.
pub fn render_samples(
    samples: &[Sample],
    format: OutputFormat,
    separator: u32,
) -> anyhow::Result<String> {
    let mut out = String::new();
    let samples = samples.iter().copied();

    let rendered = match format {
        OutputFormat::Raw => render_raw(&mut out, samples),
        OutputFormat::Table => render_table(&mut out, samples, separator),
        OutputFormat::Json => render_json(&mut out, samples, separator),
    };
    rendered.context("Failed to render samples")?;

    if format == OutputFormat::Json {
        out.push('\n');
    }

    Ok(out)
}
