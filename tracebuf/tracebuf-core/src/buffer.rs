use core::{cell::RefCell, fmt, mem::MaybeUninit};

use critical_section::Mutex;

use crate::{DEFAULT_CAPACITY, clock::Clock, render, sample::Sample};

/// Slot storage and write cursor. Slots stay uninitialized until their first write.
struct Ring<const N: usize> {
    slots: [MaybeUninit<Sample>; N],
    /// Total samples written since the last clear. The next slot is `write_cursor % N`.
    write_cursor: u64,
}

impl<const N: usize> Ring<N> {
    const fn new() -> Self {
        Ring {
            slots: [const { MaybeUninit::uninit() }; N],
            write_cursor: 0,
        }
    }

    fn push(&mut self, sample: Sample) {
        let slot = (self.write_cursor % N as u64) as usize;
        self.slots[slot] = MaybeUninit::new(sample);
        self.write_cursor = self.write_cursor.wrapping_add(1);
    }

    fn len(&self) -> usize {
        if self.write_cursor >= N as u64 {
            N
        } else {
            self.write_cursor as usize
        }
    }

    fn get(&self, index: usize) -> Option<Sample> {
        if index >= self.len() {
            return None;
        }

        // Every slot below len() was written since the last clear
        Some(unsafe { self.slots[index].assume_init() })
    }

    fn clear(&mut self) {
        self.write_cursor = 0;
    }
}

/// Ring buffer of timestamped trace samples.
///
/// Recording is safe from any context, including interrupt handlers: the slot write and the cursor
/// update happen inside one `critical_section::with`. Once more than `N` samples were recorded the
/// oldest ones are silently overwritten.
///
/// Dumps read one sample per critical section. They never see a torn sample, but a dump that runs
/// while recording continues may visit a mix of old and new samples.
///
/// Dumps walk the physical slots `0..len()`. After the buffer wrapped this is not the recording
/// order: the oldest surviving sample sits at slot `total_recorded() % N`.
pub struct TraceBuffer<C, const N: usize = DEFAULT_CAPACITY> {
    clock: C,
    ring: Mutex<RefCell<Ring<N>>>,
}

impl<C: Clock, const N: usize> TraceBuffer<C, N> {
    pub const fn new(clock: C) -> Self {
        const { assert!(N > 0, "Trace buffer capacity must be at least 1") };

        TraceBuffer {
            clock,
            ring: Mutex::new(RefCell::new(Ring::new())),
        }
    }

    /// Records `value` with the current clock reading. Never blocks on anything but the critical
    /// section, never allocates and never fails.
    pub fn record(&self, value: u32) {
        critical_section::with(|cs| {
            // slot order follows timestamp order
            let timestamp_us = self.clock.now_us();
            self.ring
                .borrow_ref_mut(cs)
                .push(Sample::new(timestamp_us, value));
        });
    }

    /// Records `value` with a timestamp the caller already took.
    pub fn record_at(&self, timestamp_us: u32, value: u32) {
        critical_section::with(|cs| {
            self.ring
                .borrow_ref_mut(cs)
                .push(Sample::new(timestamp_us, value));
        });
    }

    /// Discards all recorded samples. Storage is not erased, it just becomes unreachable.
    pub fn clear(&self) {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).clear());
    }

    /// Number of samples a dump would visit right now.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.ring.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Samples recorded since the last clear, including overwritten ones.
    pub fn total_recorded(&self) -> u64 {
        critical_section::with(|cs| self.ring.borrow_ref(cs).write_cursor)
    }

    /// Returns the sample in physical slot `index`, if it is currently visible.
    pub fn get(&self, index: usize) -> Option<Sample> {
        critical_section::with(|cs| self.ring.borrow_ref(cs).get(index))
    }

    /// Iterates the visible samples in physical slot order.
    pub fn samples(&self) -> Samples<'_, C, N> {
        Samples {
            buffer: self,
            index: 0,
            end: self.len(),
        }
    }

    /// Writes one line per sample: sequence number, delta time and the value in hex.
    pub fn dump_raw<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        render::render_raw(sink, self.samples())
    }

    /// Writes the samples as table rows, starting a new row at every `separator_value`.
    pub fn dump_table<W: fmt::Write + ?Sized>(
        &self,
        sink: &mut W,
        separator_value: u32,
    ) -> fmt::Result {
        render::render_table(sink, self.samples(), separator_value)
    }

    /// Writes the samples as a JSON array with one object per `separator_value` group.
    pub fn dump_json<W: fmt::Write + ?Sized>(
        &self,
        sink: &mut W,
        separator_value: u32,
    ) -> fmt::Result {
        render::render_json(sink, self.samples(), separator_value)
    }
}

/// Iterator over the samples of a [`TraceBuffer`], see [`TraceBuffer::samples`].
///
/// Stops early if the buffer is cleared while iterating.
pub struct Samples<'a, C, const N: usize> {
    buffer: &'a TraceBuffer<C, N>,
    index: usize,
    end: usize,
}

impl<'a, C: Clock, const N: usize> Iterator for Samples<'a, C, N> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.end {
            return None;
        }

        let sample = self.buffer.get(self.index)?;
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.index))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use std::{string::String, vec::Vec};

    type TestBuffer<const N: usize> = TraceBuffer<fn() -> u32, N>;

    fn zero_clock() -> u32 {
        0
    }

    fn new_buffer<const N: usize>() -> TestBuffer<N> {
        TraceBuffer::new(zero_clock as fn() -> u32)
    }

    fn values<const N: usize>(buffer: &TestBuffer<N>) -> Vec<u32> {
        buffer.samples().map(|s| s.value).collect()
    }

    #[test]
    fn test_pre_wrap_samples_in_call_order() {
        let buffer = new_buffer::<8>();
        for value in [5, 6, 7] {
            buffer.record(value);
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(values(&buffer), [5, 6, 7]);
    }

    #[test]
    fn test_capacity_bound() {
        let buffer = new_buffer::<4>();
        for value in 0..37 {
            buffer.record(value);
            assert!(buffer.len() <= 4);
        }

        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.samples().count(), 4);
        assert_eq!(buffer.total_recorded(), 37);
    }

    #[test]
    fn test_overwrite_hits_slot_zero() {
        let buffer = new_buffer::<4>();
        for value in 100..105 {
            buffer.record(value);
        }

        // 5th record lands in slot 4 % 4 = 0
        assert_eq!(buffer.get(0).map(|s| s.value), Some(104));
        assert_eq!(values(&buffer), [104, 101, 102, 103]);
    }

    #[test]
    fn test_dump_order_is_physical_after_wrap() {
        let buffer = new_buffer::<3>();
        for value in 0..5 {
            buffer.record_at(value * 10, value);
        }

        // Slots hold v3, v4, v2: not chronological, the oldest sample is at slot 5 % 3 = 2
        assert_eq!(values(&buffer), [3, 4, 2]);
        let timestamps: Vec<u32> = buffer.samples().map(|s| s.timestamp_us).collect();
        assert_eq!(timestamps, [30, 40, 20]);
    }

    #[test]
    fn test_clear_resets_count_not_storage() {
        let buffer = new_buffer::<4>();
        for value in 0..6 {
            buffer.record(value);
        }

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.total_recorded(), 0);
        assert_eq!(buffer.get(0), None);
        assert_eq!(buffer.samples().count(), 0);

        let mut out = String::new();
        buffer.dump_raw(&mut out).unwrap();
        assert_eq!(out, "");

        // recording restarts at slot 0
        buffer.record(42);
        assert_eq!(values(&buffer), [42]);
    }

    #[test]
    fn test_record_uses_clock() {
        static NOW: AtomicU32 = AtomicU32::new(1000);
        fn stepping_clock() -> u32 {
            NOW.fetch_add(25, Ordering::Relaxed)
        }

        let buffer: TestBuffer<4> = TraceBuffer::new(stepping_clock as fn() -> u32);
        buffer.record(1);
        buffer.record(2);

        let samples: Vec<Sample> = buffer.samples().collect();
        assert_eq!(samples, [Sample::new(1000, 1), Sample::new(1025, 2)]);
    }

    #[test]
    fn test_samples_stop_after_concurrent_clear() {
        let buffer = new_buffer::<4>();
        for value in 0..3 {
            buffer.record(value);
        }

        let mut samples = buffer.samples();
        assert_eq!(samples.next().map(|s| s.value), Some(0));
        buffer.clear();
        assert_eq!(samples.next(), None);
    }

    #[test]
    fn test_record_from_many_threads() {
        static BUFFER: TraceBuffer<fn() -> u32, 64> = TraceBuffer::new(zero_clock as fn() -> u32);

        let handles: Vec<_> = (0..4u32)
            .map(|thread| {
                std::thread::spawn(move || {
                    for i in 0..100 {
                        BUFFER.record(thread * 1000 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(BUFFER.total_recorded(), 400);
        assert_eq!(BUFFER.len(), 64);

        // every slot holds a complete value written by one of the threads
        for sample in BUFFER.samples() {
            assert!(sample.value % 1000 < 100, "Torn value {}", sample.value);
        }
    }
}
