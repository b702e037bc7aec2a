use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use coopboard_config::SessionConfig;
use time::Duration;

/// Create session cookie.
pub fn session_cookie(config: &SessionConfig, token: &str) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token.to_string()))
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(config.ttl_secs))
        .build()
}

/// Create removal cookie for session.
pub fn clear_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Get the session token from cookies. Empty values count as absent.
pub fn session_token(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            secret: "s".to_string(),
            ttl_secs: 3600,
            refresh_threshold_secs: 600,
            cookie_name: "coopboard_session".to_string(),
            secure_cookies: true,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&config(), "abc");

        assert_eq!(cookie.name(), "coopboard_session");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&config());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn test_session_token_ignores_empty_value() {
        let jar = CookieJar::new().add(Cookie::new("coopboard_session", ""));
        assert_eq!(session_token(&jar, "coopboard_session"), None);

        let jar = CookieJar::new().add(Cookie::new("coopboard_session", "tok"));
        assert_eq!(session_token(&jar, "coopboard_session").as_deref(), Some("tok"));
    }
}
