use chrono::{DateTime, Duration, TimeZone};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Date at which `debt` reaches zero when paying down `daily_rate` per day.
///
/// Returns `None` for a non-positive or non-finite rate, for zero debt, or
/// when the projection falls outside the representable calendar.
pub fn project_completion<Tz: TimeZone>(
    debt: u64,
    daily_rate: f64,
    now: DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    if debt == 0 || !daily_rate.is_finite() || daily_rate <= 0.0 {
        return None;
    }
    let days_remaining = debt as f64 / daily_rate;
    let millis = (days_remaining * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis > i64::MAX as f64 {
        return None;
    }
    let offset = Duration::try_milliseconds(millis as i64)?;
    now.checked_add_signed(offset)
}

/// Whole days until completion, rounded up.
pub fn days_remaining(debt: u64, daily_rate: f64) -> Option<u64> {
    if debt == 0 || !daily_rate.is_finite() || daily_rate <= 0.0 {
        return None;
    }
    Some((debt as f64 / daily_rate).ceil() as u64)
}
