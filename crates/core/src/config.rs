//! Environment-driven settings shared by the library and the CLI.

use std::time::Duration;

use uuid::Uuid;

/// Default third-party QR generation endpoint.
pub const DEFAULT_QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default public site that hosts memory play pages.
pub const DEFAULT_PLAY_BASE_URL: &str = "https://memowindow.com";

/// How long a QR fetch may take before the placeholder is drawn instead.
pub const DEFAULT_QR_TIMEOUT: Duration = Duration::from_secs(5);

/// QR service endpoint.
///
/// Uses `MEMOWINDOW_QR_ENDPOINT` if set, otherwise [`DEFAULT_QR_ENDPOINT`].
pub fn qr_endpoint() -> String {
    env_or("MEMOWINDOW_QR_ENDPOINT", DEFAULT_QR_ENDPOINT)
}

/// Base URL for play pages.
///
/// Uses `MEMOWINDOW_PLAY_BASE_URL` if set, otherwise [`DEFAULT_PLAY_BASE_URL`].
pub fn play_base_url() -> String {
    env_or("MEMOWINDOW_PLAY_BASE_URL", DEFAULT_PLAY_BASE_URL)
}

/// Play page URL for a memory, e.g. `https://memowindow.com/play.html?memory_id=<uuid>`.
pub fn play_page_url(base_url: &str, memory_id: &Uuid) -> String {
    format!("{}/play.html?memory_id={}", base_url.trim_end_matches('/'), memory_id)
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_page_url_trims_trailing_slash() {
        let id = Uuid::nil();
        assert_eq!(
            play_page_url("https://example.com/", &id),
            "https://example.com/play.html?memory_id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_env_or_falls_back_on_missing() {
        assert_eq!(env_or("MEMOWINDOW_TEST_SURELY_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn test_defaults_are_nonempty() {
        assert!(!qr_endpoint().is_empty());
        assert!(!play_base_url().is_empty());
    }
}
