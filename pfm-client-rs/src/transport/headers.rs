//! MyBank API header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

// lowercase form of `config::CORRELATION_ID_HEADER`, as `from_static` requires
const CORRELATION_ID_HEADER_NAME: &str = "x-correlation-id";

/// Headers sent on every call, authenticated or not.
pub fn base_headers(correlation_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        reqwest::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    if let Ok(value) = HeaderValue::from_str(correlation_id) {
        headers.insert(HeaderName::from_static(CORRELATION_ID_HEADER_NAME), value);
    }

    headers
}

/// Headers for an API call, with the bearer credential when one is present.
///
/// A token that cannot be carried in a header is dropped; the server then
/// answers 401 and the caller goes through renewal.
pub fn api_headers(bearer: Option<&str>, correlation_id: &str) -> HeaderMap {
    let mut headers = base_headers(correlation_id);

    if let Some(token) = bearer.filter(|t| !t.is_empty()) {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
            Err(_) => warn!("Access token is not a valid header value; sending without it"),
        }
    }

    headers
}

/// Headers for the renewal call. Never carries a bearer credential.
pub fn refresh_headers(correlation_id: &str) -> HeaderMap {
    base_headers(correlation_id)
}

/// Merge caller-supplied headers over `headers`. Caller headers cannot
/// replace `Authorization`.
pub fn merge_extra(headers: &mut HeaderMap, extra: &HeaderMap) {
    for (name, value) in extra {
        if name == reqwest::header::AUTHORIZATION {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CORRELATION_ID_HEADER;

    #[test]
    fn test_bearer_attached_when_present() {
        let headers = api_headers(Some("tok1"), "cid");
        assert_eq!(headers.get("authorization").unwrap(), "Bearer tok1");
        assert_eq!(headers.get(CORRELATION_ID_HEADER).unwrap(), "cid");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_no_bearer_without_token() {
        assert!(api_headers(None, "cid").get("authorization").is_none());
        assert!(api_headers(Some(""), "cid").get("authorization").is_none());
        assert!(refresh_headers("cid").get("authorization").is_none());
    }

    #[test]
    fn test_invalid_token_is_dropped() {
        let headers = api_headers(Some("bad\ntoken"), "cid");
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn test_merge_extra_keeps_authorization() {
        let mut headers = api_headers(Some("tok1"), "cid");
        let mut extra = HeaderMap::new();
        extra.insert("authorization", HeaderValue::from_static("Bearer forged"));
        extra.insert("x-device-id", HeaderValue::from_static("dev-1"));
        merge_extra(&mut headers, &extra);

        assert_eq!(headers.get("authorization").unwrap(), "Bearer tok1");
        assert_eq!(headers.get("x-device-id").unwrap(), "dev-1");
    }
}
