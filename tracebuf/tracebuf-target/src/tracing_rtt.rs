//! Dump output over an RTT up channel for probe-rs based targets.

use core::{cell::RefCell, fmt};

use critical_section::Mutex;
use rtt_target::UpChannel;

use crate::{TRACE, TRACE_CAPACITY};

/// Longest raw dump line: a 4 digit index, a 10 digit delta with sign, the hex value and `\n`.
/// Table cells and JSON entries are shorter per sample.
const DUMP_LINE_MAX_LEN: usize = 34;

/// Size of the default dump channel, a complete dump of a full buffer fits without the host
/// reading in between.
pub const TRACE_CHANNEL_SIZE: usize = TRACE_CAPACITY * DUMP_LINE_MAX_LEN + 16;

static TRACE_CHANNEL: Mutex<RefCell<Option<UpChannel>>> = Mutex::new(RefCell::new(None));

pub fn set_trace_channel(channel: UpChannel) {
    critical_section::with(|cs| {
        TRACE_CHANNEL.borrow_ref_mut(cs).replace(channel);
    });
}

/// `fmt::Write` adapter for an RTT up channel. Fails as soon as the channel cannot take all bytes
/// of a write, nothing is retried.
pub struct RttSink<'a> {
    channel: &'a mut UpChannel,
}

impl<'a> RttSink<'a> {
    pub fn new(channel: &'a mut UpChannel) -> Self {
        RttSink { channel }
    }
}

impl fmt::Write for RttSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes_written = self.channel.write(s.as_bytes());
        if bytes_written < s.len() {
            return Err(fmt::Error);
        }
        Ok(())
    }
}

/// Runs `f` with a sink on the trace channel.
///
/// The channel is taken out of its slot for the duration of the dump, so interrupts stay enabled
/// while formatting. Fails if the channel was never set or a write did not fit. Dumps must not run
/// inside a critical section if the channel blocks when full.
fn with_trace_channel(f: impl FnOnce(&mut RttSink<'_>) -> fmt::Result) -> fmt::Result {
    let Some(mut channel) = critical_section::with(|cs| TRACE_CHANNEL.borrow_ref_mut(cs).take())
    else {
        #[cfg(feature = "defmt")]
        defmt::warn!("Trace channel not initialized, cannot dump trace buffer");

        return Err(fmt::Error);
    };

    let result = f(&mut RttSink::new(&mut channel));

    #[cfg(feature = "defmt")]
    if result.is_err() {
        defmt::warn!("Trace channel buffer full, dump truncated");
    }

    critical_section::with(|cs| {
        TRACE_CHANNEL.borrow_ref_mut(cs).replace(channel);
    });
    result
}

/// Writes the raw listing of the global trace buffer to the trace channel.
pub fn trace_dump_rtt() -> fmt::Result {
    with_trace_channel(|sink| TRACE.dump_raw(sink))
}

/// Writes the global trace buffer as table rows to the trace channel.
pub fn trace_table_dump_rtt(newline_value: u32) -> fmt::Result {
    with_trace_channel(|sink| TRACE.dump_table(sink, newline_value))
}

/// Writes the global trace buffer as a JSON array to the trace channel.
pub fn trace_json_dump_rtt(array_split_value: u32) -> fmt::Result {
    with_trace_channel(|sink| {
        TRACE.dump_json(sink, array_split_value)?;
        fmt::Write::write_char(sink, '\n')
    })
}

#[cfg(feature = "defmt")]
/// Initializes tracebuf with default RTT configuration:
/// - Channel 0 for defmt (1kB, NoBlockSkip)
/// - Channel 1 for trace dumps (`TRACE_CHANNEL_SIZE`, BlockIfFull)
pub fn tracebuf_init_default() {
    let channels = rtt_target::rtt_init! {
        up: {
            0: {
                size: 1024,
                mode: rtt_target::ChannelMode::NoBlockSkip,
                name: "defmt"
            }
            1: {
                size: TRACE_CHANNEL_SIZE,
                mode: rtt_target::ChannelMode::BlockIfFull,
                name: "TraceBuf"
            }
        }
    };

    // Set defmt channel
    let defmt_channel = channels.up.0;
    rtt_target::set_defmt_channel(defmt_channel);

    // Set trace channel
    let trace_channel = channels.up.1;
    set_trace_channel(trace_channel);

    defmt::info!("Trace buffer ready, {} samples", TRACE_CAPACITY);
}

#[cfg(not(feature = "defmt"))]
/// Initializes tracebuf with default RTT configuration:
/// - Channel 0 for trace dumps (`TRACE_CHANNEL_SIZE`, BlockIfFull)
pub fn tracebuf_init_default() {
    let channels = rtt_target::rtt_init! {
        up: {
            0: {
                size: TRACE_CHANNEL_SIZE,
                mode: rtt_target::ChannelMode::BlockIfFull,
                name: "TraceBuf"
            }
        }
    };

    set_trace_channel(channels.up.0);
}
