use std::env;

/// Origin of the page bundle in local development.
const DEV_PAGES_ORIGIN: &str = "http://localhost:3000";

/// Origins allowed to call the API with the session cookie attached.
///
/// Requests carry credentials, so a wildcard can never be honoured; `*`
/// entries are dropped. Trailing slashes are trimmed because browsers send
/// `Origin` without one.
///
/// # Environment Variables
///
/// - `ALLOWED_ORIGINS`: comma-separated origins (default: `http://localhost:3000`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => Self::from_list(&raw),
            Err(_) => Self::default(),
        }
    }

    pub fn from_list(raw: &str) -> Self {
        let mut allowed_origins: Vec<String> = Vec::new();

        for origin in raw.split(',').map(|s| s.trim().trim_end_matches('/')) {
            if origin.is_empty() || origin == "*" {
                continue;
            }
            if !allowed_origins.iter().any(|o| o == origin) {
                allowed_origins.push(origin.to_string());
            }
        }

        Self { allowed_origins }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEV_PAGES_ORIGIN.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list_trims_and_dedupes() {
        let config =
            CorsConfig::from_list(" https://app.coopboard.test/ ,https://app.coopboard.test,,");
        assert_eq!(config.allowed_origins, vec!["https://app.coopboard.test"]);
    }

    #[test]
    fn test_from_list_drops_wildcard() {
        let config = CorsConfig::from_list("*,https://board.coopboard.test");
        assert_eq!(config.allowed_origins, vec!["https://board.coopboard.test"]);

        assert!(CorsConfig::from_list("*").allowed_origins.is_empty());
    }
}
