use chrono::{DateTime, FixedOffset};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::domain::Status;

pub const RATE_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const IMAGE_LIMIT_HEADER: &str = "X-RateLimit-ImageLimit";
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
pub const IMAGE_REMAINING_HEADER: &str = "X-RateLimit-ImageRemaining";
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing header {name}")]
    MissingHeader { name: &'static str },

    #[error("response header {name} is not an integer: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("reset time {value} is out of range")]
    ResetOutOfRange { value: i64 },
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonResponse {
    message: String,
}

/// Build a [`Status`] from the rate-limit headers of a successful response.
pub fn decode_rate_limit_headers(
    headers: &HeaderMap,
    timezone: &FixedOffset,
) -> Result<Status, TransportError> {
    let reset_epoch = header_int::<i64>(headers, RESET_HEADER)?;
    let reset = DateTime::from_timestamp(reset_epoch, 0)
        .ok_or(TransportError::ResetOutOfRange { value: reset_epoch })?
        .with_timezone(timezone);

    Ok(Status {
        limit: header_int(headers, RATE_LIMIT_HEADER)?,
        image_limit: header_int(headers, IMAGE_LIMIT_HEADER)?,
        remaining: header_int(headers, REMAINING_HEADER)?,
        image_remaining: header_int(headers, IMAGE_REMAINING_HEADER)?,
        reset,
    })
}

/// Extract the `message` field from an error body.
pub fn decode_error_message(body: &[u8]) -> Result<String, TransportError> {
    let parsed: ErrorJsonResponse = serde_json::from_slice(body)?;
    Ok(parsed.message)
}

fn header_int<T: std::str::FromStr>(
    headers: &HeaderMap,
    name: &'static str,
) -> Result<T, TransportError> {
    let value = headers
        .get(name)
        .ok_or(TransportError::MissingHeader { name })?;
    let invalid = || TransportError::InvalidHeader {
        name,
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    };
    value
        .to_str()
        .map_err(|_| invalid())?
        .trim()
        .parse::<T>()
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use reqwest::header::{HeaderName, HeaderValue};

    use super::*;

    fn set(map: &mut HeaderMap, name: &str, value: &str) {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }

    fn headers(items: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in items {
            set(&mut map, name, value);
        }
        map
    }

    fn full_headers() -> HeaderMap {
        headers(&[
            (RATE_LIMIT_HEADER, "1000"),
            (IMAGE_LIMIT_HEADER, "50"),
            (REMAINING_HEADER, "999"),
            (IMAGE_REMAINING_HEADER, "50"),
            (RESET_HEADER, "1700000000"),
        ])
    }

    #[test]
    fn decodes_all_counters_and_reset_in_timezone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let status = decode_rate_limit_headers(&full_headers(), &tokyo).unwrap();

        assert_eq!(status.limit, 1000);
        assert_eq!(status.image_limit, 50);
        assert_eq!(status.remaining, 999);
        assert_eq!(status.image_remaining, 50);
        assert_eq!(status.reset.timestamp(), 1_700_000_000);
        assert_eq!(status.reset.offset(), &tokyo);
        assert_eq!(
            status.reset,
            tokyo.with_ymd_and_hms(2023, 11, 15, 7, 13, 20).unwrap()
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_trims() {
        let map = headers(&[
            ("x-ratelimit-limit", " 1000 "),
            ("x-ratelimit-imagelimit", "50"),
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-imageremaining", "0"),
            ("x-ratelimit-reset", "0"),
        ]);
        let utc = FixedOffset::east_opt(0).unwrap();
        let status = decode_rate_limit_headers(&map, &utc).unwrap();
        assert_eq!(status.limit, 1000);
        assert_eq!(status.reset.timestamp(), 0);
    }

    #[test]
    fn missing_header_is_reported_by_name() {
        let mut map = full_headers();
        map.remove(IMAGE_REMAINING_HEADER);
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(
            decode_rate_limit_headers(&map, &utc),
            Err(TransportError::MissingHeader {
                name: IMAGE_REMAINING_HEADER
            })
        ));
    }

    #[test]
    fn non_numeric_header_is_rejected() {
        let mut map = full_headers();
        set(&mut map, REMAINING_HEADER, "lots");
        let utc = FixedOffset::east_opt(0).unwrap();
        match decode_rate_limit_headers(&map, &utc) {
            Err(TransportError::InvalidHeader { name, value }) => {
                assert_eq!(name, REMAINING_HEADER);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_reset_is_rejected() {
        let mut map = full_headers();
        set(&mut map, RESET_HEADER, "9223372036854775807");
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(
            decode_rate_limit_headers(&map, &utc),
            Err(TransportError::ResetOutOfRange { .. })
        ));
    }

    #[test]
    fn error_message_is_read_from_json_body() {
        let body = br#"{"status":429,"message":"rate limit exceeded"}"#;
        assert_eq!(decode_error_message(body).unwrap(), "rate limit exceeded");
    }

    #[test]
    fn error_body_without_message_is_a_json_error() {
        assert!(matches!(
            decode_error_message(br#"{"status":500}"#),
            Err(TransportError::Json(_))
        ));
        assert!(matches!(
            decode_error_message(b"Internal Server Error"),
            Err(TransportError::Json(_))
        ));
    }
}
