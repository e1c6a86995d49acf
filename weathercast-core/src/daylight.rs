use chrono::{DateTime, TimeZone};

/// True iff `sunrise <= now < sunset`.
///
/// The timestamps may carry different offsets; they are compared as instants.
pub fn is_day<A, B, C>(sunrise: &DateTime<A>, sunset: &DateTime<B>, now: &DateTime<C>) -> bool
where
    A: TimeZone,
    B: TimeZone,
    C: TimeZone,
{
    let now = now.timestamp_millis();
    sunrise.timestamp_millis() <= now && now < sunset.timestamp_millis()
}
