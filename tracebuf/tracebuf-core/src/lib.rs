#![no_std]

pub mod buffer;
pub mod clock;
pub mod render;
pub mod sample;
pub mod time_delta;

pub use buffer::{Samples, TraceBuffer};
pub use clock::Clock;
pub use sample::Sample;
pub use time_delta::{DeltaTracker, TimeDelta};

/// Number of samples a trace buffer keeps when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 512;
