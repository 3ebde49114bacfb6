/// A single recorded trace event: the clock reading in microseconds and the caller's payload.
///
/// The payload is opaque to the buffer. Callers usually reserve some values as event ids and one
/// as a separator that starts a new group in table and JSON dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub timestamp_us: u32,
    pub value: u32,
}

impl Sample {
    pub const fn new(timestamp_us: u32, value: u32) -> Self {
        Sample {
            timestamp_us,
            value,
        }
    }
}
