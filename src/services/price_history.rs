//! Simulated price history.
//!
//! A series has a fixed shape (one point per day ending at the generation
//! instant) and random content: each price is the base price perturbed by
//! at most ±5%, rounded to cents. Nothing here is stored; every call draws a
//! new series.

use crate::models::price_model::PricePoint;
use chrono::{DateTime, Days, SecondsFormat, Utc};
use rand::Rng;

/// Length of the series attached to every product returned by the catalog.
pub const HISTORY_WINDOW_DAYS: usize = 30;

const MAX_DEVIATION: f64 = 0.05;

/// Generates `days` points ending now, using the thread-local generator.
pub fn generate_history(base_price: f64, days: usize) -> Vec<PricePoint> {
    generate_history_at(base_price, days, Utc::now(), &mut rand::thread_rng())
}

/// Generates `days` points, oldest first, the last one stamped `now`.
///
/// Bases under about a cent have no cent value within ±5%; their prices keep
/// the band and give up the rounding.
pub fn generate_history_at<R>(
    base_price: f64,
    days: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<PricePoint>
where
    R: Rng + ?Sized,
{
    (0..days)
        .rev()
        .map(|days_ago| PricePoint {
            date: format_timestamp(days_before(now, days_ago)),
            price: simulate_price(base_price, rng),
        })
        .collect()
}

/// Millisecond-precision RFC 3339 in UTC with a `Z` suffix.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn days_before(now: DateTime<Utc>, days_ago: usize) -> DateTime<Utc> {
    u64::try_from(days_ago)
        .ok()
        .and_then(|days_ago| now.checked_sub_days(Days::new(days_ago)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn simulate_price<R>(base_price: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    if !base_price.is_finite() {
        return base_price;
    }

    let noise: f64 = rng.gen();
    let perturbed = base_price * (1.0 + (noise - 0.5) * 2.0 * MAX_DEVIATION);
    let rounded = (perturbed * 100.0).round() / 100.0;

    // Rounding to cents can step just outside the band; pull it back in.
    let low = base_price * (1.0 - MAX_DEVIATION);
    let high = base_price * (1.0 + MAX_DEVIATION);
    rounded.clamp(low.min(high), low.max(high))
}
