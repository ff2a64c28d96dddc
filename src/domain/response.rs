use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Rate-limit snapshot reported by LINE Notify with every successful response.
pub struct Status {
    /// API calls allowed per hour.
    pub limit: u32,
    /// Image uploads allowed per hour.
    pub image_limit: u32,
    /// API calls left in the current window.
    pub remaining: u32,
    /// Image uploads left in the current window.
    pub image_remaining: u32,
    /// When the counters reset, in the client's timezone.
    pub reset: DateTime<FixedOffset>,
}
