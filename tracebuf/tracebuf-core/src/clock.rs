/// Source of trace timestamps.
///
/// Must be monotonically non-decreasing with microsecond resolution. The 32-bit counter is allowed
/// to wrap, deltas are computed with wrapping subtraction.
pub trait Clock {
    fn now_us(&self) -> u32;
}

impl Clock for fn() -> u32 {
    fn now_us(&self) -> u32 {
        self()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}
