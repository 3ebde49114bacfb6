use std::io::Read;

use anyhow::Context;
use colored::Colorize;

use crate::{
    capture::{
        chronological::into_chronological,
        raw_parser::{CapturedDump, parse_raw_dump},
    },
    cli::{CommandLineArgs, Command},
    perfetto_backend::{build_trace_events, file_writer::write_perfetto_file},
    rerender::render_samples,
};

mod capture;
mod cli;
mod perfetto_backend;
mod rerender;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = CommandLineArgs::parse();

    match args.command {
        Command::Render {
            input,
            format,
            separator,
            chronological,
        } => {
            let dump = read_capture(&input)?;
            let samples = if chronological {
                into_chronological(dump.samples)
            } else {
                dump.samples
            };

            print!("{}", render_samples(&samples, format, separator)?);
        }
        Command::Perfetto {
            input,
            output,
            separator,
        } => {
            let dump = read_capture(&input)?;
            let samples = into_chronological(dump.samples);

            let trace_events = build_trace_events(&samples, separator);
            write_perfetto_file(&output, &trace_events)?;
            eprintln!(
                "{} {} events to {:?}",
                "Wrote".green().bold(),
                trace_events.len(),
                output
            );
        }
    }

    Ok(())
}

/// Reads and parses a captured raw dump from a file or stdin (`-`). Status goes to stderr so
/// stdout only carries the rendered output.
fn read_capture(input: &str) -> anyhow::Result<CapturedDump> {
    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read dump from stdin")?;
        text
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read dump file {input}"))?
    };

    let dump = parse_raw_dump(&text).context("Failed to parse raw dump")?;
    eprintln!(
        "{} {} samples",
        "Parsed".green().bold(),
        dump.samples.len()
    );
    if dump.skipped_lines > 0 {
        eprintln!(
            "{} skipped {} lines that are not part of a dump",
            "Note:".yellow(),
            dump.skipped_lines
        );
    }
    if dump.discarded_dumps > 0 {
        eprintln!(
            "{} capture holds {} earlier dumps, only the last one is used",
            "Note:".yellow(),
            dump.discarded_dumps
        );
    }

    Ok(dump)
}
