use tracebuf_core::Clock;

/// Trace clock backed by the embassy time driver, truncated to 32-bit microseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline(always)]
    fn now_us(&self) -> u32 {
        embassy_time::Instant::now().as_micros() as u32
    }
}
