pub mod clock;
pub mod keyed_mutex;
pub mod time_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use keyed_mutex::{KeyGuard, KeyedMutex};
pub use time_utils::{day_range_window, day_start_utc, platform_date_from_utc, PLATFORM_TZ};
