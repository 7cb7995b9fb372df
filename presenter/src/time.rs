use chrono::Local;

/// 24-hour wall clock, e.g. `21:07:45`.
pub const DATE_FORMAT: &str = "%H:%M:%S";

/// Current local time formatted with [`DATE_FORMAT`].
pub fn clock_now() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}
