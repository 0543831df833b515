//! Seasonal interval model for the call scheduler.
//!
//! Delays stretch and compress with wall-clock time: business hours and
//! weekdays poll faster, nights and weekends slower. A uniform jitter draw
//! keeps the traffic from looking metronomic.

use chrono::{DateTime, Datelike, Local, Timelike, Weekday};
use rand::Rng;
use std::time::Duration;

use crate::config::CallerConfig;

/// Lower bound for any computed delay.
pub const MIN_DELAY: Duration = Duration::from_millis(1000);

/// Activity factor for an hour of the day (24h clock).
///
/// Business hours are the busiest, evenings moderate, nights quiet.
pub fn time_of_day_factor(hour: u32) -> f64 {
    match hour {
        9..=17 => 0.7,
        18..=22 => 0.9,
        _ => 1.5,
    }
}

/// Activity factor for a day of the week.
pub fn day_of_week_factor(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sat | Weekday::Sun => 1.3,
        _ => 0.8,
    }
}

/// Combined seasonal multiplier for a wall-clock instant.
pub fn seasonal_multiplier(now: &DateTime<Local>) -> f64 {
    time_of_day_factor(now.hour()) * day_of_week_factor(now.weekday())
}

/// Compute the delay until the next call.
///
/// The base interval is scaled by the seasonal multiplier, then shifted by a
/// uniform draw in ±(jitter_percent/100 × seasonal interval). The result
/// never drops below [`MIN_DELAY`]. Exactly one random variate is drawn per
/// call, so a seeded `rng` makes the schedule reproducible.
pub fn next_delay<R: Rng + ?Sized>(
    config: &CallerConfig,
    now: &DateTime<Local>,
    rng: &mut R,
) -> Duration {
    let seasonal_ms = config.base_interval.as_millis() as f64 * seasonal_multiplier(now);
    let jitter_amount = f64::from(config.jitter_percent) / 100.0 * seasonal_ms;
    let jittered = seasonal_ms + rng.gen_range(-1.0..=1.0) * jitter_amount;
    let clamped = jittered.max(MIN_DELAY.as_millis() as f64);
    Duration::from_millis(clamped.round() as u64)
}
