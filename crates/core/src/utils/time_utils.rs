use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone in which calendar days (mission dates, challenge windows) are reckoned.
pub const PLATFORM_TZ: Tz = chrono_tz::Asia::Kolkata;

/// Converts a UTC instant to the platform calendar day.
pub fn platform_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Start of `date` in `tz`, expressed in UTC.
///
/// Falls back to UTC midnight when local midnight does not exist in `tz`.
pub fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    match tz.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// Half-open UTC window covering the inclusive day range `[first, last]`.
pub fn day_range_window(first: NaiveDate, last: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let end_day = last.checked_add_days(Days::new(1)).unwrap_or(last);
    (day_start_utc(first, tz), day_start_utc(end_day, tz))
}
