use log::warn;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};

/// Above this many real seconds per simulated hour a full day takes long enough
/// to be worth a warning.
pub const SLOW_SIMULATION_THRESHOLD: f64 = 60.0;

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: i64 = 24 * 3600;

/// A point on the simulated store clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Simulated seconds since midnight of the first simulated day
    pub epoch_seconds: i64,
    /// Wall-clock rendering, `HH:MM:SS`
    pub label: String,
}

impl SimTime {
    pub fn from_epoch(epoch_seconds: i64) -> Self {
        Self {
            epoch_seconds,
            label: format_hms(epoch_seconds),
        }
    }

    /// Hour of day (0-23) this instant falls in
    pub fn hour(&self) -> u32 {
        (self.epoch_seconds.rem_euclid(SECONDS_PER_DAY) / 3600) as u32
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Format simulated seconds as `HH:MM:SS`, wrapping at midnight
pub fn format_hms(epoch_seconds: i64) -> String {
    let of_day = epoch_seconds.rem_euclid(SECONDS_PER_DAY);
    format!(
        "{:02}:{:02}:{:02}",
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60
    )
}

/// Dual real/simulated clock.
///
/// `seconds_per_sim_hour` real seconds represent one simulated hour. Every
/// simulated delay in the engine goes through [`SimClock::scaled_sleep`], and
/// every simulated timestamp through [`SimClock::current_sim_time`]. The clock
/// is fixed once constructed and shared read-only by all tasks.
#[derive(Debug, Clone)]
pub struct SimClock {
    seconds_per_sim_hour: f64,
    real_start: Instant,
    sim_start_offset: i64,
}

impl SimClock {
    /// Start a clock whose simulated day begins at `opening_hour:00:00`.
    ///
    /// `seconds_per_sim_hour` must be positive; configuration validation
    /// guarantees that before a clock is built.
    pub fn new(seconds_per_sim_hour: f64, opening_hour: u32) -> Self {
        debug_assert!(seconds_per_sim_hour > 0.0);
        if seconds_per_sim_hour > SLOW_SIMULATION_THRESHOLD {
            warn!(
                "{} real seconds per simulated hour: simulation may be slow",
                seconds_per_sim_hour
            );
        }
        Self {
            seconds_per_sim_hour,
            real_start: Instant::now(),
            sim_start_offset: i64::from(opening_hour) * 3600,
        }
    }

    pub fn seconds_per_sim_hour(&self) -> f64 {
        self.seconds_per_sim_hour
    }

    /// Real seconds per simulated second
    pub fn scaling_factor(&self) -> f64 {
        self.seconds_per_sim_hour / SECONDS_PER_HOUR
    }

    /// Real duration corresponding to `simulated_seconds`, truncated to microseconds
    pub fn real_duration(&self, simulated_seconds: f64) -> Duration {
        if simulated_seconds.is_nan() || simulated_seconds <= 0.0 {
            return Duration::ZERO;
        }
        let micros = simulated_seconds * self.seconds_per_sim_hour * 1_000_000.0 / SECONDS_PER_HOUR;
        Duration::from_micros(micros as u64)
    }

    /// Suspend the calling task for the real-time equivalent of `simulated_seconds`
    pub fn scaled_sleep(&self, simulated_seconds: f64) {
        let real = self.real_duration(simulated_seconds);
        if !real.is_zero() {
            thread::sleep(real);
        }
    }

    /// Simulated time reached after `real_elapsed` of wall-clock time
    pub fn sim_time_at(&self, real_elapsed: Duration) -> SimTime {
        // 1 real microsecond == 0.0036 / seconds_per_sim_hour simulated seconds
        let micros = real_elapsed.as_micros() as f64;
        let since_opening = micros * SECONDS_PER_HOUR / (self.seconds_per_sim_hour * 1_000_000.0);
        SimTime::from_epoch(self.sim_start_offset + since_opening as i64)
    }

    pub fn current_sim_time(&self) -> SimTime {
        self.sim_time_at(self.real_start.elapsed())
    }

    /// Simulated seconds between two timestamps
    pub fn diff(&self, start: i64, end: i64) -> i64 {
        end - start
    }
}
