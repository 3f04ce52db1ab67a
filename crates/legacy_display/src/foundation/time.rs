//! Time management utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Monotonic nanosecond clock anchored at its creation
///
/// Event timestamps are expressed as nanoseconds since the clock's epoch, so
/// they are strictly comparable within one session but carry no wall-clock meaning.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Create a clock whose epoch is now
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }

    /// Nanoseconds elapsed since the epoch
    pub fn now_nanos(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Fixed-size moving average of durations, in nanoseconds
#[derive(Debug)]
struct RunningAverage {
    slots: VecDeque<u64>,
    capacity: usize,
}

impl RunningAverage {
    /// Above this average the sleep estimate is assumed to come from a coarse
    /// OS ticker and is slowly pulled down.
    const DAMPEN_THRESHOLD: u64 = 10_000_000;
    const DAMPEN_FACTOR: f64 = 0.99;

    fn new(capacity: usize, initial: u64) -> Self {
        let mut slots = VecDeque::with_capacity(capacity);
        slots.extend(std::iter::repeat(initial).take(capacity));
        Self { slots, capacity }
    }

    fn add(&mut self, value: u64) {
        if self.slots.len() == self.capacity {
            self.slots.pop_front();
        }
        self.slots.push_back(value);
    }

    fn average(&self) -> u64 {
        if self.slots.is_empty() {
            return 0;
        }
        self.slots.iter().sum::<u64>() / self.slots.len() as u64
    }

    fn dampen_for_low_res_ticker(&mut self) {
        if self.average() > Self::DAMPEN_THRESHOLD {
            for slot in &mut self.slots {
                *slot = (*slot as f64 * Self::DAMPEN_FACTOR) as u64;
            }
        }
    }
}

/// Frame limiter that holds a loop to a target frame rate
///
/// Sleeps in 1 ms steps while the remaining time exceeds the measured sleep
/// overshoot, then yields until the frame deadline. The measured averages
/// adapt to the platform's timer resolution.
#[derive(Debug)]
pub struct FrameSync {
    clock: MonotonicClock,
    next_frame: u64,
    sleep_durations: RunningAverage,
    yield_durations: RunningAverage,
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSync {
    const SAMPLES: usize = 10;

    /// Create a limiter; the first call to [`FrameSync::sync`] never waits
    pub fn new() -> Self {
        let clock = MonotonicClock::new();
        Self {
            next_frame: clock.now_nanos(),
            clock,
            sleep_durations: RunningAverage::new(Self::SAMPLES, 1_000_000),
            yield_durations: RunningAverage::new(Self::SAMPLES, 0),
        }
    }

    /// Block until the next frame of a `fps` frames-per-second schedule is due
    ///
    /// A non-positive `fps` returns immediately.
    pub fn sync(&mut self, fps: i32) {
        let Ok(fps) = u64::try_from(fps) else {
            return;
        };
        if fps == 0 {
            return;
        }

        let mut t0 = self.clock.now_nanos();
        while self.next_frame.saturating_sub(t0) > self.sleep_durations.average() {
            std::thread::sleep(Duration::from_millis(1));
            let t1 = self.clock.now_nanos();
            self.sleep_durations.add(t1 - t0);
            t0 = t1;
        }
        self.sleep_durations.dampen_for_low_res_ticker();

        let mut t0 = self.clock.now_nanos();
        while self.next_frame.saturating_sub(t0) > self.yield_durations.average() {
            std::thread::yield_now();
            let t1 = self.clock.now_nanos();
            self.yield_durations.add(t1 - t0);
            t0 = t1;
        }

        self.next_frame = (self.next_frame + NANOS_PER_SECOND / fps).max(self.clock.now_nanos());
    }
}
