use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Re-render a captured raw trace dump as raw listing, table or JSON
    Render {
        /// Captured raw dump (`-` reads from stdin)
        #[clap(long, short, default_value = "-")]
        input: String,

        /// Output format
        #[clap(long, short, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Value that starts a new row (table) or object (json), decimal or 0x-prefixed hex
        #[clap(long, short, default_value = "0", value_parser = parse_trace_value)]
        separator: u32,

        /// Rotate a wrapped dump so the oldest sample comes first. Only detects the wrap point if
        /// the dump spans less than about 35.8 minutes
        #[clap(long, action)]
        chronological: bool,
    },
    /// Export a captured raw trace dump as Perfetto JSON trace
    Perfetto {
        /// Captured raw dump (`-` reads from stdin)
        #[clap(long, short, default_value = "-")]
        input: String,

        /// Perfetto trace file to write
        #[clap(long, short, default_value = "tracebuf-perfetto.json")]
        output: PathBuf,

        /// Value that starts a group, emitted as slices spanning one group each
        #[clap(long, short, value_parser = parse_trace_value)]
        separator: Option<u32>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Raw,
    Table,
    Json,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Parses a trace value given as decimal or `0x`-prefixed hex
fn parse_trace_value(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };

    parsed.map_err(|e| format!("invalid trace value '{s}': {e}"))
}
