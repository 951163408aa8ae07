use std::collections::VecDeque;
use std::time::Duration;

/// Per-tick streaming statistics for instrumentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    pub spawned_this_tick: usize,
    pub despawned_this_tick: usize,
    pub failures_this_tick: usize,
    pub total_loaded: usize,
    pub total_shifts: u64,
    pub ticks: u64,
    pub tick_time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TickSample {
    duration: Duration,
    shifted: bool,
}

/// Durations of the most recent ticks.
///
/// Ticks that re-based the origin touch every loaded chunk, so they are also
/// summarized on their own: a slow shift should not hide in the overall
/// average.
#[derive(Debug, Clone)]
pub struct TickTimer {
    samples: VecDeque<TickSample>,
    window: usize,
}

impl TickTimer {
    /// Keep the last `window` ticks (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn record(&mut self, duration: Duration, shifted: bool) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(TickSample { duration, shifted });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> Duration {
        mean(self.samples.iter().map(|s| s.duration))
    }

    pub fn max(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.duration)
            .max()
            .unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.duration)
            .min()
            .unwrap_or_default()
    }

    /// Number of remembered ticks that shifted the origin.
    pub fn shift_ticks(&self) -> usize {
        self.samples.iter().filter(|s| s.shifted).count()
    }

    /// Slowest remembered tick that shifted the origin.
    pub fn max_shift_tick(&self) -> Option<Duration> {
        self.samples
            .iter()
            .filter(|s| s.shifted)
            .map(|s| s.duration)
            .max()
    }

    /// Mean over ticks without an origin shift.
    pub fn steady_average(&self) -> Duration {
        mean(
            self.samples
                .iter()
                .filter(|s| !s.shifted)
                .map(|s| s.duration),
        )
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

fn mean(durations: impl Iterator<Item = Duration>) -> Duration {
    let (sum, n) = durations.fold((Duration::ZERO, 0u32), |(sum, n), d| (sum + d, n + 1));
    if n == 0 { Duration::ZERO } else { sum / n }
}
