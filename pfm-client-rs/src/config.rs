//! Configuration constants and endpoint paths for the MyBank PFM API.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// API origin used when nothing else is configured (local development gateway).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable selecting the API origin.
pub const BASE_URL_ENV: &str = "PFM_API_URL";

/// Upper bound for every outbound call, including the renewal call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for HTTP requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
pub const USER_AGENT: &str = concat!("pfm-client/", env!("CARGO_PKG_VERSION"));

/// Header carrying the per-request correlation id.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Default look-back window for spending analysis, in days.
pub const DEFAULT_SPENDING_DAYS: u32 = 30;

/// Storage key for the access/refresh pair, kept as one JSON value so the
/// two tokens are always written together.
pub const TOKENS_KEY: &str = "tokens";

/// Storage key for the cached user identity.
pub const USER_KEY: &str = "user";

// ── Endpoint paths ─────────────────────────────────────────────────────────

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";
/// Renewal endpoint. Called without a bearer header.
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";
pub const ME_PATH: &str = "/api/v1/auth/me";
pub const KAKAO_CALLBACK_PATH: &str = "/api/v1/auth/kakao/callback";

pub const ASSETS_PATH: &str = "/api/v1/pfm/assets";
pub const ASSETS_SYNC_PATH: &str = "/api/v1/pfm/assets/sync";
pub const TRANSACTIONS_PATH: &str = "/api/v1/pfm/transactions";
pub const SPENDING_ANALYSIS_PATH: &str = "/api/v1/pfm/spending/analysis";

pub const TRANSFER_PATH: &str = "/api/v1/payment/transfer";
pub const PAYMENT_HISTORY_PATH: &str = "/api/v1/payment/history";
const PAYMENT_PATH_PREFIX: &str = "/api/v1/payment";

pub const INVEST_SUMMARY_PATH: &str = "/api/v1/invest/summary";
const ROUND_UP_PATH_PREFIX: &str = "/api/v1/invest/roundup";

/// Returns the path of a single payment.
pub fn payment_path(payment_id: &str) -> String {
    format!("{}/{}", PAYMENT_PATH_PREFIX, urlencoding::encode(payment_id))
}

/// Returns the round-up toggle path for an account.
pub fn round_up_path(enable: bool, account_id: &str) -> String {
    let action = if enable { "enable" } else { "disable" };
    format!(
        "{}/{}/{}",
        ROUND_UP_PATH_PREFIX,
        action,
        urlencoding::encode(account_id)
    )
}

/// Parse and validate an API origin.
///
/// Only `http` and `https` are accepted. A trailing slash is tolerated.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::Config(format!(
                "Unsupported base URL scheme '{}' (expected http or https)",
                other
            )))
        }
    }
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("Base URL '{}' cannot be a base", raw)));
    }
    Ok(url)
}

/// Resolve the API origin from `PFM_API_URL`, falling back to [`DEFAULT_BASE_URL`].
pub fn base_url_from_env() -> Result<Url> {
    match std::env::var(BASE_URL_ENV) {
        Ok(val) if !val.trim().is_empty() => parse_base_url(&val),
        _ => parse_base_url(DEFAULT_BASE_URL),
    }
}

/// Join an API path onto the base URL, keeping any path prefix of the base.
pub fn endpoint_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    url.set_path(&format!("{}/{}", prefix, path));
    url.set_query(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        assert!(parse_base_url("http://localhost:8080").is_ok());
        assert!(parse_base_url("https://api.mybank.example/").is_ok());
    }

    #[test]
    fn test_parse_base_url_invalid() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("ftp://files.example").is_err());
        assert!(parse_base_url("mailto:me@example.com").is_err());
    }

    #[test]
    fn test_endpoint_url_joins_paths() {
        let base = parse_base_url("http://localhost:8080").unwrap();
        let url = endpoint_url(&base, ASSETS_PATH);
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/pfm/assets");
    }

    #[test]
    fn test_endpoint_url_keeps_base_prefix() {
        let base = parse_base_url("https://gw.example/bank/").unwrap();
        let url = endpoint_url(&base, "/api/v1/invest/summary");
        assert_eq!(url.as_str(), "https://gw.example/bank/api/v1/invest/summary");
    }

    #[test]
    fn test_round_up_path_encodes_account() {
        assert_eq!(
            round_up_path(true, "acc-1"),
            "/api/v1/invest/roundup/enable/acc-1"
        );
        let path = round_up_path(false, "acc/../x");
        assert!(path.starts_with("/api/v1/invest/roundup/disable/"));
        assert!(!path.ends_with("/x"));
        assert!(path.contains("%2F"));
    }

    #[test]
    fn test_payment_path() {
        assert_eq!(payment_path("pay-42"), "/api/v1/payment/pay-42");
    }
}
