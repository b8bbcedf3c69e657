use std::time::Duration;

pub const API_URI: &str = "https://api.torn.com";

/// Max amount of requests the API accepts per minute
pub const DEFAULT_REQUEST_QUOTA: usize = 100;

/// Length of the sliding window the quota applies to
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// How long to sleep between re-checks when the window is full
pub const DEFAULT_THROTTLE_STEP: Duration = Duration::from_secs(1);

/// How many times a request is attempted when the API
/// reports a temporary backend error (code 17)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay between those attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How long cached responses stay valid
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
