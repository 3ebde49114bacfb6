//! Text renderers for a sequence of samples.
//!
//! All renderers compute delta times against the previously rendered sample, starting from a zero
//! baseline, so the first delta is the raw timestamp. The first error returned by the sink aborts
//! rendering and is passed back to the caller.

use core::fmt::{self, Write};

use crate::{sample::Sample, time_delta::DeltaTracker};

/// One line per sample: `n=   0 t=      100 v=0x0000000a`, later lines carry a `+` before the delta.
pub fn render_raw<W, I>(sink: &mut W, samples: I) -> fmt::Result
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Sample>,
{
    let mut deltas = DeltaTracker::new();

    for (index, sample) in samples.into_iter().enumerate() {
        let delta = deltas.advance(sample.timestamp_us);
        let sign = if index == 0 { ' ' } else { '+' };
        writeln!(
            sink,
            "n={:4} t={}{:8} v=0x{:08x}",
            index, sign, delta, sample.value
        )?;
    }

    Ok(())
}

/// Cells of `| value: delta` with a line break before every `separator_value` except a leading one.
pub fn render_table<W, I>(sink: &mut W, samples: I, separator_value: u32) -> fmt::Result
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Sample>,
{
    let mut deltas = DeltaTracker::new();

    for (index, sample) in samples.into_iter().enumerate() {
        let delta = deltas.advance(sample.timestamp_us);
        if index > 0 && sample.value == separator_value {
            writeln!(sink)?;
        }
        write!(sink, "| {:3}: {:<12}", sample.value, delta)?;
    }

    writeln!(sink)
}

/// A JSON array of objects mapping `"value": delta`, a new object starts at every `separator_value`.
///
/// The array is only opened if the first sample is a separator, and an empty input renders as
/// `}]`. Both are kept as is since downstream scripts parse this exact output.
pub fn render_json<W, I>(sink: &mut W, samples: I, separator_value: u32) -> fmt::Result
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Sample>,
{
    let mut deltas = DeltaTracker::new();
    let mut samples = samples.into_iter().enumerate().peekable();

    while let Some((index, sample)) = samples.next() {
        let delta = deltas.advance(sample.timestamp_us);
        if sample.value == separator_value {
            if index == 0 {
                sink.write_char('[')?;
            } else {
                sink.write_str("},")?;
            }
            sink.write_char('{')?;
        }

        write!(sink, "\"{}\":{}", sample.value, delta)?;

        if let Some((_, next)) = samples.peek() {
            if next.value != separator_value {
                sink.write_char(',')?;
            }
        }
    }

    sink.write_str("}]")
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::buffer::TraceBuffer;
    use std::{string::String, vec::Vec};

    fn samples(entries: &[(u32, u32)]) -> Vec<Sample> {
        entries
            .iter()
            .map(|&(timestamp_us, value)| Sample::new(timestamp_us, value))
            .collect()
    }

    fn grouped_samples() -> Vec<Sample> {
        samples(&[(10, 99), (15, 1), (22, 2), (40, 99), (41, 3)])
    }

    /// Sink that accepts a fixed number of writes and fails afterwards
    struct FailingSink {
        remaining_writes: usize,
        written: String,
    }

    impl Write for FailingSink {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.remaining_writes == 0 {
                return Err(fmt::Error);
            }
            self.remaining_writes -= 1;
            self.written.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn test_raw_listing() {
        let mut out = String::new();
        render_raw(&mut out, samples(&[(100, 10), (150, 20), (220, 30)])).unwrap();

        assert_eq!(
            out,
            "n=   0 t=      100 v=0x0000000a\n\
             n=   1 t=+      50 v=0x00000014\n\
             n=   2 t=+      70 v=0x0000001e\n"
        );
    }

    #[test]
    fn test_raw_listing_from_buffer() {
        let buffer: TraceBuffer<fn() -> u32, 4> = TraceBuffer::new((|| 0) as fn() -> u32);
        buffer.record_at(100, 10);
        buffer.record_at(150, 20);
        buffer.record_at(220, 30);

        let mut out = String::new();
        buffer.dump_raw(&mut out).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("n=   0 t=      100"));
        assert!(lines[1].starts_with("n=   1 t=+      50"));
        assert!(lines[2].starts_with("n=   2 t=+      70"));
    }

    #[test]
    fn test_raw_delta_across_clock_wrap() {
        let mut out = String::new();
        render_raw(&mut out, samples(&[(u32::MAX - 9, 1), (5, 2)])).unwrap();

        let second = out.lines().nth(1).unwrap();
        assert_eq!(second, "n=   1 t=+      15 v=0x00000002");
    }

    #[test]
    fn test_table_rows() {
        let mut out = String::new();
        render_table(&mut out, grouped_samples(), 99).unwrap();

        assert_eq!(
            out,
            "|  99: 10          |   1: 5           |   2: 7           \n\
             |  99: 18          |   3: 1           \n"
        );
    }

    #[test]
    fn test_table_without_separator_is_one_row() {
        let mut out = String::new();
        render_table(&mut out, samples(&[(1, 1), (2, 2), (3, 3)]), 99).unwrap();

        assert_eq!(out.lines().count(), 1);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_table_empty() {
        let mut out = String::new();
        render_table(&mut out, samples(&[]), 99).unwrap();
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_json_groups() {
        let mut out = String::new();
        render_json(&mut out, grouped_samples(), 99).unwrap();

        assert_eq!(out, r#"[{"99":10,"1":5,"2":7},{"99":18,"3":1}]"#);
    }

    #[test]
    fn test_json_empty_is_degenerate() {
        let mut out = String::new();
        render_json(&mut out, samples(&[]), 99).unwrap();
        assert_eq!(out, "}]");
    }

    #[test]
    fn test_json_without_leading_separator() {
        let mut out = String::new();
        render_json(&mut out, samples(&[(1, 1), (3, 2), (4, 99), (9, 5)]), 99).unwrap();

        // no opening bracket since the first sample does not start a group
        assert_eq!(out, r#""1":1,"2":2},{"99":1,"5":5}]"#);
    }

    #[test]
    fn test_json_every_sample_is_separator() {
        let mut out = String::new();
        render_json(&mut out, samples(&[(1, 7), (2, 7), (4, 7)]), 7).unwrap();

        assert_eq!(out, r#"[{"7":1},{"7":1},{"7":2}]"#);
    }

    #[test]
    fn test_sink_error_aborts_rendering() {
        let mut sink = FailingSink {
            remaining_writes: 2,
            written: String::new(),
        };

        let result = render_json(&mut sink, grouped_samples(), 99);
        assert_eq!(result, Err(fmt::Error));
        assert_eq!(sink.written, "[{");
    }
}
