use core::fmt;

/// Elapsed microseconds between two consecutive samples of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDelta {
    delta: u32,
}

impl TimeDelta {
    /// Time from `last` to `now`, correct across a wrap of the 32-bit clock.
    pub const fn between(last: u32, now: u32) -> Self {
        TimeDelta {
            delta: now.wrapping_sub(last),
        }
    }

    /// Returns true if `now` lies before `last`, i.e. the delta only makes sense as a backwards
    /// step. A wrapped dump shows exactly one of these at the oldest sample.
    pub const fn is_backwards(&self) -> bool {
        self.delta >= 2u32.pow(31)
    }

    pub const fn get_delta_us(&self) -> u32 {
        self.delta
    }
}

impl fmt::Display for TimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // forwards width and alignment flags of the caller
        fmt::Display::fmt(&self.delta, f)
    }
}

/// Running delta computation over a sequence of timestamps, starting from a zero baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaTracker {
    last_timestamp: u32,
}

impl DeltaTracker {
    pub const fn new() -> Self {
        DeltaTracker { last_timestamp: 0 }
    }

    /// Returns the delta to the previous timestamp and remembers `timestamp_us` as the new baseline.
    pub fn advance(&mut self, timestamp_us: u32) -> TimeDelta {
        let delta = TimeDelta::between(self.last_timestamp, timestamp_us);
        self.last_timestamp = timestamp_us;
        delta
    }
}
