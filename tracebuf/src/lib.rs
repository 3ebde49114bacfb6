//! Fixed-size execution trace ring buffer for embedded Rust.
//!
//! Record `u32` events with microsecond timestamps from anywhere, including interrupt handlers,
//! and dump the most recent samples later as a raw listing, a table or a JSON array. Enable one of
//! the target features (`stm32`, `rp2040`, `rp235xa`, `rp235xb`) to get the global buffer, the
//! embassy-time clock and RTT output.
#![no_std]

pub use tracebuf_core::*;

#[cfg(any(
    feature = "stm32",
    feature = "rp2040",
    feature = "rp235xa",
    feature = "rp235xb"
))]
pub use tracebuf_target::*;
