use std::env;

use crate::env_flag;

/// Session token and cookie settings.
///
/// # Environment Variables
///
/// - `SESSION_SECRET`: HMAC secret shared with the identity service
/// - `SESSION_TTL_SECS`: lifetime of a freshly issued session (default: 7 days)
/// - `SESSION_REFRESH_THRESHOLD_SECS`: renew when less than this remains (default: 1 day)
/// - `SESSION_COOKIE_NAME`: cookie carrying the session (default: `coopboard_session`)
/// - `SESSION_COOKIE_SECURE`: set the `Secure` attribute (default: `true`)
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_secs: i64,
    pub refresh_threshold_secs: i64,
    pub cookie_name: String,
    pub secure_cookies: bool,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604800), // 7 days
            refresh_threshold_secs: env::var("SESSION_REFRESH_THRESHOLD_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86400), // 1 day
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "coopboard_session".to_string()),
            secure_cookies: env_flag("SESSION_COOKIE_SECURE", true),
        }
    }
}
