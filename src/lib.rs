pub mod consts;
pub mod clock;
pub mod cache;
pub mod schema;
pub mod error;
pub mod request;
pub mod limiter;
pub mod client;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use super::consts::*;
    pub use super::clock::{ClockExt, SystemClock};
    pub use super::cache::Cache;
    pub use super::error::Error;
    pub use super::request::RequestSpec;
    pub use super::limiter::RequestWindow;
    pub use super::client::Client;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

lazy_static::lazy_static! {
    /// Timeout of outgoing requests, in seconds
    ///
    /// Can be changed with the `TORN_API_REQUESTS_TIMEOUT` environment variable
    pub static ref REQUESTS_TIMEOUT: u64 = std::env::var("TORN_API_REQUESTS_TIMEOUT")
        .ok()
        .and_then(|timeout| timeout.parse().ok())
        .unwrap_or(8);
}
