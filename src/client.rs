use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::Cache;
use crate::clock::{ClockExt, SystemClock};
use crate::error::{self, Error};
use crate::limiter::RequestWindow;
use crate::request::RequestSpec;

use crate::consts::{
    API_URI,
    DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_DELAY
};

/// Client of the Torn City API
///
/// Every request goes through the sliding-window rate limiter and the
/// response interpreter, retrying temporary backend errors automatically.
/// Meant to be used sequentially from a single thread
pub struct Client {
    api_key: String,
    comment: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
    window: RequestWindow,
    cache: Cache,
    clock: Arc<dyn ClockExt>
}

impl Client {
    pub fn new(api_key: impl ToString) -> Self {
        Self::with_clock(api_key, Arc::new(SystemClock))
    }

    /// Build a client over a custom time source
    pub fn with_clock(api_key: impl ToString, clock: Arc<dyn ClockExt>) -> Self {
        tracing::debug!("Initializing API client");

        Self {
            api_key: api_key.to_string(),
            comment: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            window: RequestWindow::new(clock.clone()),
            cache: Cache::new(clock.clone()),
            clock
        }
    }

    /// Build a client from the `TORN_API_KEY` environment variable
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self::new(std::env::var("TORN_API_KEY")?))
    }

    /// Free-text comment appended to every request,
    /// shown in the key's usage log
    pub fn with_comment(mut self, comment: impl ToString) -> Self {
        self.comment = Some(comment.to_string());

        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;

        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;

        self
    }

    /// Override the default 100 requests / 60 seconds quota
    pub fn with_quota(mut self, quota: usize, window: Duration) -> Self {
        self.window = self.window.with_quota(quota, window);

        self
    }

    pub fn with_throttle_step(mut self, step: Duration) -> Self {
        self.window = self.window.with_throttle_step(step);

        self
    }

    /// Fail instead of blocking forever when the request window stays full
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.window = self.window.with_wait_timeout(timeout);

        self
    }

    /// Persist the request window to a file across restarts
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.window = self.window.with_snapshot(path);

        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Cache::with_ttl(ttl, self.clock.clone());

        self
    }

    #[inline]
    pub fn window(&self) -> &RequestWindow {
        &self.window
    }

    #[inline]
    pub fn cache(&mut self) -> &mut Cache {
        &mut self.cache
    }

    /// Issue one attempt: admission check, HTTP GET, timestamp
    /// recording, response classification
    fn issue(&mut self, spec: &RequestSpec) -> Result<Value, Error> {
        self.window.admit()?;

        let mut request = minreq::get(format!("{API_URI}{}", spec.path()))
            .with_timeout(*crate::REQUESTS_TIMEOUT);

        for (name, value) in spec.params(&self.api_key, self.comment.as_deref()) {
            request = request.with_param(name, value);
        }

        let response = request.send();

        // The request counts against the quota whether or not it succeeded
        self.window.record();

        let response = response?;

        error::interpret(response.status_code, response.as_str()?)
    }

    /// Make a request to the API
    ///
    /// Waits on the rate window if needed, then issues the HTTP GET and
    /// classifies the response. A temporary backend error (code 17) is
    /// retried automatically; every retry passes through the rate window
    /// again and counts against the quota
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn request(&mut self, spec: &RequestSpec) -> Result<Value, Error> {
        tracing::debug!(path = %spec.path(), "Making API request");

        let clock = self.clock.clone();

        error::retry_with(self.max_retries, self.retry_delay, clock.as_ref(), || self.issue(spec))
    }

    /// Make a request, reusing a cached response when one is still valid
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn request_cached(&mut self, spec: &RequestSpec) -> Result<Value, Error> {
        let key = spec.cache_key();

        if let Some(value) = self.cache.get(&key) {
            tracing::debug!(%key, "Returning cached response");

            return Ok(value);
        }

        let value = self.request(spec)?;

        self.cache.set(key, value.clone());

        Ok(value)
    }

    /// Get user data
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_user(&mut self, user_id: Option<u64>, selections: &[&str]) -> Result<Value, Error> {
        self.request(&RequestSpec::new("user")
            .maybe_id(user_id)
            .with_selections(selections))
    }

    /// Get property data
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_property(&mut self, property_id: u64, selections: &[&str]) -> Result<Value, Error> {
        self.request(&RequestSpec::new("property")
            .with_id(property_id)
            .with_selections(selections))
    }

    /// Get faction data
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_faction(&mut self, faction_id: Option<u64>, selections: &[&str]) -> Result<Value, Error> {
        self.request(&RequestSpec::new("faction")
            .maybe_id(faction_id)
            .with_selections(selections))
    }

    /// Get company data
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_company(&mut self, company_id: Option<u64>, selections: &[&str]) -> Result<Value, Error> {
        self.request(&RequestSpec::new("company")
            .maybe_id(company_id)
            .with_selections(selections))
    }

    /// Get item market data
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_market(&mut self, item_id: u64, selections: &[&str]) -> Result<Value, Error> {
        self.request(&RequestSpec::new("market")
            .with_id(item_id)
            .with_selections(selections))
    }

    /// Get general Torn data
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_torn(&mut self, torn_id: Option<u64>, selections: &[&str]) -> Result<Value, Error> {
        self.request(&RequestSpec::new("torn")
            .maybe_id(torn_id)
            .with_selections(selections))
    }

    /// Get info about the API key itself
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_key_info(&mut self) -> Result<Value, Error> {
        self.request(&RequestSpec::new("key")
            .with_selections(["info"]))
    }
}
