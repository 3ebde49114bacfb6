#![no_std]

#[cfg(test)]
extern crate std;

use core::fmt;

use tracebuf_core::{DEFAULT_CAPACITY, TraceBuffer};

cfg_if::cfg_if! {
    if #[cfg(any(
        feature = "stm32",
        feature = "rp2040",
        feature = "rp235xa",
        feature = "rp235xb"
    ))] {
        mod tracing_rtt;
        pub use tracing_rtt::*;
    }
}

pub mod embassy_clock;
pub mod scope;

pub use embassy_clock::EmbassyClock;

/// Capacity of the global trace buffer
pub const TRACE_CAPACITY: usize = DEFAULT_CAPACITY;

/// The global trace buffer all free functions of this crate operate on.
pub static TRACE: TraceBuffer<EmbassyClock, TRACE_CAPACITY> = TraceBuffer::new(EmbassyClock);

/// Serializes tests that use the global trace buffer.
#[cfg(test)]
static GLOBAL_TRACE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Records `value` with the current embassy time. Safe to call from interrupt handlers.
#[inline]
pub fn trace(value: u32) {
    TRACE.record(value);
}

/// Discards all samples of the global trace buffer.
pub fn trace_clear() {
    #[cfg(feature = "defmt")]
    let discarded = TRACE.len();

    TRACE.clear();

    #[cfg(feature = "defmt")]
    defmt::trace!("Trace buffer cleared, {} samples discarded", discarded);
}

/// Writes the raw listing of the global trace buffer to `sink`.
pub fn trace_dump<W: fmt::Write + ?Sized>(sink: &mut W) -> fmt::Result {
    TRACE.dump_raw(sink)
}

/// Writes the global trace buffer as table rows, starting a new row at `newline_value`.
pub fn trace_table_dump<W: fmt::Write + ?Sized>(sink: &mut W, newline_value: u32) -> fmt::Result {
    TRACE.dump_table(sink, newline_value)
}

/// Writes the global trace buffer as a JSON array split at `array_split_value`.
pub fn trace_json_dump<W: fmt::Write + ?Sized>(
    sink: &mut W,
    array_split_value: u32,
) -> fmt::Result {
    TRACE.dump_json(sink, array_split_value)
}
