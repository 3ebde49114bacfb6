use anyhow::{Context, bail};
use tracebuf_core::Sample;

/// Samples recovered from a captured raw dump listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedDump {
    /// Samples in the order they were listed (physical slot order)
    pub samples: Vec<Sample>,
    /// Non-empty lines that did not parse as dump lines, e.g. interleaved log output
    pub skipped_lines: usize,
    /// Earlier dumps in the same capture that were superseded by a later one
    pub discarded_dumps: usize,
}

/// Parses the output of a raw dump back into samples.
///
/// Timestamps are rebuilt by summing the deltas from a zero baseline, which gives back the exact
/// recorded clock readings. If the capture holds several dumps, the last one wins. Lines that are
/// not dump lines are counted and skipped, a gap in the sequence numbers is an error.
pub fn parse_raw_dump(text: &str) -> anyhow::Result<CapturedDump> {
    let mut samples = Vec::new();
    let mut skipped_lines = 0;
    let mut discarded_dumps = 0;
    let mut timestamp_us = 0u32;

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Log output may start with `n=` too, only well-formed lines belong to a dump
        let Ok((sequence, delta_us, value)) = parse_line(line) else {
            skipped_lines += 1;
            continue;
        };

        if sequence == 0 {
            // A new dump starts, drop the previous one
            if !samples.is_empty() {
                discarded_dumps += 1;
                samples.clear();
            }
            timestamp_us = 0;
        } else if sequence != samples.len() {
            bail!(
                "Line {}: expected sequence number {}, found {}",
                line_index + 1,
                samples.len(),
                sequence
            );
        }

        timestamp_us = timestamp_us.wrapping_add(delta_us);
        samples.push(Sample::new(timestamp_us, value));
    }

    Ok(CapturedDump {
        samples,
        skipped_lines,
        discarded_dumps,
    })
}

/// Splits `n=   1 t=+      50 v=0x00000014` into sequence number, delta and value
fn parse_line(line: &str) -> anyhow::Result<(usize, u32, u32)> {
    let rest = line
        .strip_prefix("n=")
        .context("Missing sequence number")?;
    let (sequence, rest) = rest.split_once("t=").context("Missing delta time")?;
    let (delta, value) = rest.split_once("v=").context("Missing value")?;

    let sequence = sequence
        .trim()
        .parse::<usize>()
        .context("Failed to parse sequence number")?;
    let delta = delta
        .trim()
        .trim_start_matches('+')
        .trim_start()
        .parse::<u32>()
        .context("Failed to parse delta time")?;
    let value = value
        .trim()
        .strip_prefix("0x")
        .context("Value is not hex prefixed")?;
    let value = u32::from_str_radix(value, 16).context("Failed to parse value")?;

    Ok((sequence, delta, value))
}
