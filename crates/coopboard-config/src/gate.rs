use std::env;

/// Paths the edge gate and the client guard redirect to.
///
/// # Environment Variables
///
/// - `SIGN_IN_PATH`: where anonymous requests to protected pages go (default: `/sign-in`)
/// - `DEFAULT_LANDING_PATH`: where signed-in users land when leaving an auth page
///   without a usable `redirectTo` (default: `/my-applications`)
/// - `GUARD_FALLBACK_PATH`: where the client guard sends a principal whose role
///   is not allowed on the page (default: `/my-applications`)
/// - `GATE_EXTRA_EXCLUSIONS`: comma-separated glob-like patterns that bypass the gate
#[derive(Clone, Debug)]
pub struct GateConfig {
    pub sign_in_path: String,
    pub landing_path: String,
    pub fallback_path: String,
    pub extra_exclusions: Vec<String>,
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self {
            sign_in_path: env::var("SIGN_IN_PATH").unwrap_or_else(|_| "/sign-in".to_string()),
            landing_path: env::var("DEFAULT_LANDING_PATH")
                .unwrap_or_else(|_| "/my-applications".to_string()),
            fallback_path: env::var("GUARD_FALLBACK_PATH")
                .unwrap_or_else(|_| "/my-applications".to_string()),
            extra_exclusions: env::var("GATE_EXTRA_EXCLUSIONS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/sign-in".to_string(),
            landing_path: "/my-applications".to_string(),
            fallback_path: "/my-applications".to_string(),
            extra_exclusions: Vec::new(),
        }
    }
}
