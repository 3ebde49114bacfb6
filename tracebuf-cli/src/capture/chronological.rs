use tracebuf_core::{Sample, TimeDelta};

/// Index of the oldest sample in a dump listed in physical slot order.
///
/// A wrapped buffer is listed as the newest samples followed by the oldest ones, so time steps
/// backwards exactly once: at the oldest sample. Without such a step the dump never wrapped and
/// the oldest sample is the first one.
///
/// A step counts as backwards if it exceeds 2^31 us (about 35.8 minutes) as a forward delta. A
/// dump spanning more than that may have its wrap point look like a forward step and is then
/// returned unrotated.
pub fn oldest_index(samples: &[Sample]) -> usize {
    samples
        .windows(2)
        .position(|pair| {
            TimeDelta::between(pair[0].timestamp_us, pair[1].timestamp_us).is_backwards()
        })
        .map_or(0, |i| i + 1)
}

/// Rotates the samples of a wrapped dump into recording order.
pub fn into_chronological(mut samples: Vec<Sample>) -> Vec<Sample> {
    let oldest = oldest_index(&samples);
    samples.rotate_left(oldest);
    samples
}

/// Absolute timeline in microseconds relative to the first sample, unwrapping the 32-bit clock.
/// Expects samples in recording order.
pub fn unwrapped_timeline(samples: &[Sample]) -> Vec<u64> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };

    let mut elapsed = 0u64;
    let mut last = first.timestamp_us;
    samples
        .iter()
        .map(|sample| {
            elapsed += TimeDelta::between(last, sample.timestamp_us).get_delta_us() as u64;
            last = sample.timestamp_us;
            elapsed
        })
        .collect()
}
