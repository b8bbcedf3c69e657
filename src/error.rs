use std::time::Duration;

use serde_json::Value;

use crate::clock::ClockExt;
use crate::schema::ErrorBody;

/// Error code of temporary backend failures, the only code worth retrying
pub const RETRYABLE_CODE: u8 = 17;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Application-level error reported in the response body
    #[error("API error code {code}: {message}")]
    Api {
        code: u8,
        message: String
    },

    /// Non-200 HTTP response, kept verbatim for diagnostics
    #[error("HTTP error {status}: {body}")]
    Http {
        status: i32,
        body: String
    },

    #[error("Failed to fetch data: {0}")]
    Minreq(#[from] minreq::Error),

    #[error("Failed to parse response body: {0}")]
    Json(#[from] serde_json::Error),

    /// The throttled wait on a full request window exceeded the
    /// caller-set bound. Only raised when a wait timeout is configured
    #[error("Request window wait exceeded {0:?}")]
    ThrottleTimeout(Duration)
}

impl Error {
    #[inline]
    pub fn api(code: u8) -> Self {
        Self::Api {
            code,
            message: error_message(code)
        }
    }
}

/// Resolve the human-readable message of an API error code
///
/// The 0-18 taxonomy is fixed by the API. Unknown codes
/// get a generic message
pub fn error_message(code: u8) -> String {
    let message = match code {
        0  => "Unknown error: Unhandled error, should not occur.",
        1  => "Key is empty: Private key is empty in current request.",
        2  => "Incorrect Key: Private key is wrong/incorrect format.",
        3  => "Wrong type: Requesting an incorrect basic type.",
        4  => "Wrong fields: Requesting incorrect selection fields.",
        5  => "Too many requests: Requests are blocked for a small period of time because of too many requests per user (max 100 per minute).",
        6  => "Incorrect ID: Wrong ID value.",
        7  => "Incorrect ID-entity relation: A requested selection is private (For example, personal data of another user/faction).",
        8  => "IP block: Current IP is banned for a small period of time because of abuse.",
        9  => "API disabled: Api system is currently disabled.",
        10 => "Key owner is in federal jail: Current key can't be used because owner is in federal jail.",
        11 => "Key change error: You can only change your API key once every 60 seconds.",
        12 => "Key read error: Error reading key from Database.",
        13 => "The key is temporarily disabled due to owner inactivity: The key owner hasn't been online for more than 7 days.",
        14 => "Daily read limit reached: Too many records have been pulled today by this user from our cloud services.",
        15 => "Temporary error: An error code specifically for testing purposes that has no dedicated meaning.",
        16 => "Access level of this key is not high enough: A selection is being called of which this key does not have permission to access.",
        17 => "Backend error occurred, please try again.",
        18 => "API key has been paused by the owner.",

        _ => return format!("Unknown error code {code}")
    };

    message.to_string()
}

/// Classify a raw HTTP response
///
/// Status 200 with no `error` field returns the parsed body unchanged.
/// A body carrying an `error` field becomes [`Error::Api`], any other
/// status becomes [`Error::Http`] with status and body kept verbatim
pub fn interpret(status: i32, body: &str) -> Result<Value, Error> {
    tracing::debug!(status, "Handling API response");

    if status != 200 {
        tracing::error!(status, "HTTP error");

        return Err(Error::Http {
            status,
            body: body.to_string()
        });
    }

    let data = serde_json::from_str::<Value>(body)?;

    if data.get("error").is_some() {
        let body = serde_json::from_value::<ErrorBody>(data)?;

        let error = Error::api(body.error.code);

        tracing::error!(code = body.error.code, "{error}");

        return Err(error);
    }

    Ok(data)
}

/// Run a request up to `max_retries` times
///
/// Only [`Error::Api`] with code 17 is retried, sleeping `retry_delay`
/// between attempts. Every other failure propagates immediately because
/// it signals a caller or key problem rather than transience. Exhausting
/// all attempts fails with the code 17 error
pub fn retry_with<F>(
    max_retries: u32,
    retry_delay: Duration,
    clock: &dyn ClockExt,
    mut request: F
) -> Result<Value, Error>
where
    F: FnMut() -> Result<Value, Error>
{
    for attempt in 1..=max_retries {
        match request() {
            Err(Error::Api { code: RETRYABLE_CODE, .. }) => {
                tracing::warn!(attempt, max_retries, "Temporary backend error, retrying");

                if attempt < max_retries {
                    clock.sleep(retry_delay);
                }
            }

            result => return result
        }
    }

    tracing::error!(max_retries, "Max retries reached");

    Err(Error::api(RETRYABLE_CODE))
}
