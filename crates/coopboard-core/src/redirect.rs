//! Redirect intents round-tripped through the sign-in flow.
//!
//! An unauthenticated request to a protected page is sent to sign-in with the
//! original path in the `redirectTo` query parameter. Whoever consumes that
//! parameter later must pass it through [`safe_redirect_target`] so an
//! attacker cannot turn the sign-in page into an open redirect.

pub const REDIRECT_PARAM: &str = "redirectTo";

/// `Location` for sending an anonymous request to sign-in.
pub fn sign_in_location(sign_in_path: &str, original_path: &str) -> String {
    format!(
        "{sign_in_path}?{REDIRECT_PARAM}={}",
        urlencoding::encode(original_path)
    )
}

/// A redirect target is safe when it is a path on this origin.
pub fn is_safe_redirect(target: &str) -> bool {
    let Some(rest) = target.strip_prefix('/') else {
        return false;
    };

    // "//evil.com" and "/\evil.com" are protocol-relative in browsers.
    if rest.starts_with('/') || rest.starts_with('\\') {
        return false;
    }

    !target
        .chars()
        .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
}

pub fn safe_redirect_target(candidate: Option<&str>, default: &str) -> String {
    match candidate {
        Some(target) if is_safe_redirect(target) => target.to_string(),
        _ => default.to_string(),
    }
}
