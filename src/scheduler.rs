//! Fixed-period cooperative scheduling.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Free-running millisecond counter. Wraps at `u32::MAX`; callers compare
/// with `wrapping_sub`.
pub trait TickSource {
    fn now_ms(&self) -> u32;

    /// Called between polls while waiting for the next period.
    fn relax(&self) {
        std::hint::spin_loop();
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn relax(&self) {
        (**self).relax()
    }
}

/// Millisecond counter advanced from the 1 kHz timer interrupt.
///
/// `tick` is the only writer. Reads and the increment are single 32-bit
/// atomic operations, so the loop never sees a torn value.
#[derive(Debug, Default)]
pub struct SysTick {
    count: AtomicU32,
}

impl SysTick {
    pub const fn new() -> Self {
        SysTick {
            count: AtomicU32::new(0),
        }
    }

    /// Interrupt handler body.
    #[inline]
    pub fn tick(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

impl TickSource for SysTick {
    #[inline]
    fn now_ms(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Wall-clock ticks for running the loop on a host.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        StdClock {
            start: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for StdClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    fn relax(&self) {
        std::thread::yield_now();
    }
}

/// Releases the control loop once per period.
///
/// The first call only records a baseline. Later calls wait until a full
/// period has passed since the previous release, then rebase on the current
/// tick: a period stretched by slow work is not made up afterwards.
#[derive(Debug)]
pub struct TimeSliceScheduler<T> {
    ticks: T,
    last: Option<u32>,
}

impl<T: TickSource> TimeSliceScheduler<T> {
    pub fn new(ticks: T) -> Self {
        TimeSliceScheduler { ticks, last: None }
    }

    /// Returns the milliseconds elapsed since the previous release (0 on the
    /// first call). A value above `period_ms` means the last period overran.
    pub fn wait_next_period(&mut self, period_ms: u32) -> u32 {
        let (now, elapsed) = match self.last {
            None => (self.ticks.now_ms(), 0),
            Some(last) => loop {
                let now = self.ticks.now_ms();
                let elapsed = now.wrapping_sub(last);
                if elapsed >= period_ms {
                    break (now, elapsed);
                }
                self.ticks.relax();
            },
        };
        self.last = Some(now);
        elapsed
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }
}
