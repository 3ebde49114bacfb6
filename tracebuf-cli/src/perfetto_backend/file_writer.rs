use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;

use crate::perfetto_backend::trace_event::TracingEvent;

/// Writes all events into a Perfetto (Chrome JSON) trace file, replacing an existing file
pub fn write_perfetto_file(
    perfetto_filename: &Path,
    trace_events: &[TracingEvent],
) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .truncate(true)
        .write(true)
        .open(perfetto_filename)
        .context("Failed to open perfetto trace file")?;
    let mut file = BufWriter::new(file);

    write_trace_events(&mut file, trace_events)?;
    file.flush().context("Failed to flush perfetto trace file")
}

fn write_trace_events<W: Write>(out: &mut W, trace_events: &[TracingEvent]) -> anyhow::Result<()> {
    out.write_all(b"{\"traceEvents\": [")
        .context("Failed to write to perfetto trace file")?;

    for (index, trace_event) in trace_events.iter().enumerate() {
        // write comma if not first event
        if index > 0 {
            out.write_all(b",").context("Failed to add comma seperator")?;
        }

        // write trace event as json
        let json_str = "\n\t".to_string() + &trace_event.to_json()?;
        out.write_all(json_str.as_bytes())
            .context("Failed to write trace event to perfetto file")?;
    }

    // finalise file
    out.write_all(b"\n]}\n")
        .context("Failed to finalise perfetto trace file")
}
