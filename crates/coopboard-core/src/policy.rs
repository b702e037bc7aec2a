//! Route policy shared by the edge gate and the client guard.
//!
//! A [`RoutePolicy`] maps protected path prefixes to the roles allowed to see
//! them and lists the auth pages a signed-in principal is bounced away from.
//! The edge gate only asks "is this protected?"; the client guard and the
//! access API ask "which roles may render this?". Both read the same table.

use serde::Serialize;

use crate::redirect::is_safe_redirect;
use crate::roles::Role;

/// Roles admitted by a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSet {
    /// Any authenticated principal.
    Any,
    Only(Vec<Role>),
}

impl RoleSet {
    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        RoleSet::Only(roles.into_iter().collect())
    }

    pub fn contains(&self, role: Role) -> bool {
        match self {
            RoleSet::Any => true,
            RoleSet::Only(roles) => roles.contains(&role),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RoleSet::Only(roles) if roles.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub roles: RoleSet,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            prefix: prefix.into(),
            roles,
        }
    }
}

/// Classification of a request path from the gate's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass<'a> {
    Protected(&'a RouteRule),
    Auth,
    Public,
}

impl RouteClass<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Protected(_) => "protected",
            RouteClass::Auth => "auth",
            RouteClass::Public => "public",
        }
    }
}

impl Serialize for RouteClass<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("route prefix must start with '/': {prefix}")]
    InvalidPrefix { prefix: String },

    #[error("protected route {prefix} admits no roles")]
    EmptyRoleSet { prefix: String },

    #[error("prefix {prefix} is both protected and an auth page")]
    OverlappingPrefix { prefix: String },

    #[error("fallback path {path} does not admit role {role}")]
    FallbackNotUniversal { path: String, role: Role },

    #[error("sign-in path {path} must be an auth page, not {class}")]
    SignInNotAuthPage { path: String, class: &'static str },

    #[error("landing path {path} is not a same-origin path")]
    UnsafeLandingPath { path: String },

    #[error("landing path {path} is an auth page")]
    LandingIsAuthPage { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    pub protected: Vec<RouteRule>,
    pub auth_prefixes: Vec<String>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::board_packages()
    }
}

impl RoutePolicy {
    pub fn new(protected: Vec<RouteRule>, auth_prefixes: Vec<String>) -> Self {
        Self {
            protected,
            auth_prefixes,
        }
    }

    /// The board-package application areas and the sign-in/recovery pages.
    pub fn board_packages() -> Self {
        use Role::*;

        Self {
            protected: vec![
                RouteRule::new(
                    "/applications",
                    RoleSet::only([Applicant, CoApplicant, Guarantor, Broker, Admin, Board]),
                ),
                RouteRule::new("/broker", RoleSet::only([Broker, Admin])),
                RouteRule::new("/agent", RoleSet::only([Admin])),
                RouteRule::new("/board", RoleSet::only([Board])),
                RouteRule::new("/my-applications", RoleSet::Any),
                RouteRule::new("/settings", RoleSet::Any),
            ],
            auth_prefixes: [
                "/sign-in",
                "/sign-up",
                "/forgot-password",
                "/reset-password",
                "/verify-email",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    /// Protected prefixes are checked before auth prefixes; a path matching
    /// neither is public. Matching is plain `starts_with` on the path.
    pub fn classify(&self, path: &str) -> RouteClass<'_> {
        if let Some(rule) = self.protected.iter().find(|r| path.starts_with(&r.prefix)) {
            return RouteClass::Protected(rule);
        }

        if self.auth_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return RouteClass::Auth;
        }

        RouteClass::Public
    }

    pub fn is_protected(&self, path: &str) -> bool {
        matches!(self.classify(path), RouteClass::Protected(_))
    }

    pub fn is_auth_page(&self, path: &str) -> bool {
        matches!(self.classify(path), RouteClass::Auth)
    }

    /// Allow-list for a protected path, `None` for auth and public paths.
    pub fn allowed_roles(&self, path: &str) -> Option<&RoleSet> {
        match self.classify(path) {
            RouteClass::Protected(rule) => Some(&rule.roles),
            _ => None,
        }
    }

    pub fn permits(&self, path: &str, role: Role) -> bool {
        self.allowed_roles(path)
            .map(|roles| roles.contains(role))
            .unwrap_or(true)
    }

    /// Startup check for configuration errors that would otherwise only show
    /// up as every user being bounced to the fallback page.
    pub fn validate(&self, fallback_path: &str) -> Result<(), PolicyError> {
        let prefixes = self
            .protected
            .iter()
            .map(|r| r.prefix.as_str())
            .chain(self.auth_prefixes.iter().map(String::as_str));

        for prefix in prefixes {
            if !prefix.starts_with('/') {
                return Err(PolicyError::InvalidPrefix {
                    prefix: prefix.to_string(),
                });
            }
        }

        for rule in &self.protected {
            if rule.roles.is_empty() {
                return Err(PolicyError::EmptyRoleSet {
                    prefix: rule.prefix.clone(),
                });
            }

            if let Some(auth) = self
                .auth_prefixes
                .iter()
                .find(|a| a.starts_with(&rule.prefix) || rule.prefix.starts_with(a.as_str()))
            {
                return Err(PolicyError::OverlappingPrefix {
                    prefix: auth.clone(),
                });
            }
        }

        if let Some(role) = Role::ALL
            .into_iter()
            .find(|role| !self.permits(fallback_path, *role))
        {
            return Err(PolicyError::FallbackNotUniversal {
                path: fallback_path.to_string(),
                role,
            });
        }

        Ok(())
    }

    /// Checks the gate's own redirect targets against the table. A sign-in
    /// page that is not an auth page, or a landing page that is one, would
    /// redirect to itself on every request.
    pub fn validate_gate_paths(&self, sign_in_path: &str, landing_path: &str) -> Result<(), PolicyError> {
        match self.classify(sign_in_path) {
            RouteClass::Auth => {}
            class => {
                return Err(PolicyError::SignInNotAuthPage {
                    path: sign_in_path.to_string(),
                    class: class.as_str(),
                });
            }
        }

        if !is_safe_redirect(landing_path) {
            return Err(PolicyError::UnsafeLandingPath {
                path: landing_path.to_string(),
            });
        }

        if self.is_auth_page(landing_path) {
            return Err(PolicyError::LandingIsAuthPage {
                path: landing_path.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_protected_prefixes() {
        let policy = RoutePolicy::default();

        for path in [
            "/applications",
            "/applications/42/documents",
            "/broker/submit",
            "/agent/inbox",
            "/board/reviews",
            "/my-applications",
            "/settings/profile",
        ] {
            assert!(policy.is_protected(path), "{path} should be protected");
        }
    }

    #[test]
    fn test_classify_auth_prefixes() {
        let policy = RoutePolicy::default();

        for path in [
            "/sign-in",
            "/sign-up/broker",
            "/forgot-password",
            "/reset-password/token",
            "/verify-email",
        ] {
            assert_eq!(policy.classify(path), RouteClass::Auth, "{path}");
        }
    }

    #[test]
    fn test_classify_public_paths() {
        let policy = RoutePolicy::default();

        for path in ["/", "/about", "/pricing", "/api/session", "/auth/callback"] {
            assert_eq!(policy.classify(path), RouteClass::Public, "{path}");
        }
    }

    #[test]
    fn test_prefix_matching_is_starts_with() {
        let policy = RoutePolicy::default();
        assert!(policy.is_protected("/boardroom"));
        assert!(policy.is_protected("/settings-export"));
    }

    #[test]
    fn test_allowed_roles_for_board_area() {
        let policy = RoutePolicy::default();
        let roles = policy.allowed_roles("/board/queue").unwrap();

        assert!(roles.contains(Role::Board));
        assert!(!roles.contains(Role::Applicant));
        assert!(!roles.contains(Role::Admin));
    }

    #[test]
    fn test_shared_applications_area_roles() {
        let policy = RoutePolicy::default();

        for role in [
            Role::Applicant,
            Role::CoApplicant,
            Role::Guarantor,
            Role::Broker,
            Role::Admin,
            Role::Board,
        ] {
            assert!(policy.permits("/applications/7", role), "{role}");
        }
        assert!(!policy.permits("/applications/7", Role::Viewer));
    }

    #[test]
    fn test_public_and_auth_paths_permit_everyone() {
        let policy = RoutePolicy::default();

        for role in Role::ALL {
            assert!(policy.permits("/", role));
            assert!(policy.permits("/sign-in", role));
        }
    }

    #[test]
    fn test_default_policy_is_valid() {
        let policy = RoutePolicy::default();
        assert_eq!(policy.validate("/my-applications"), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_role_set() {
        let mut policy = RoutePolicy::default();
        policy
            .protected
            .push(RouteRule::new("/reports", RoleSet::Only(vec![])));

        assert_eq!(
            policy.validate("/my-applications"),
            Err(PolicyError::EmptyRoleSet {
                prefix: "/reports".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_fallback_that_bounces() {
        let policy = RoutePolicy::default();

        assert_eq!(
            policy.validate("/board"),
            Err(PolicyError::FallbackNotUniversal {
                path: "/board".to_string(),
                role: Role::Applicant,
            })
        );
    }

    #[test]
    fn test_default_gate_paths_are_valid() {
        let policy = RoutePolicy::default();
        assert_eq!(policy.validate_gate_paths("/sign-in", "/my-applications"), Ok(()));
    }

    #[test]
    fn test_validate_rejects_landing_that_bounces() {
        let policy = RoutePolicy::default();

        assert_eq!(
            policy.validate_gate_paths("/sign-in", "/sign-in"),
            Err(PolicyError::LandingIsAuthPage {
                path: "/sign-in".to_string()
            })
        );

        for unsafe_landing in ["https://evil.com", "//evil.com", "my-applications"] {
            assert_eq!(
                policy.validate_gate_paths("/sign-in", unsafe_landing),
                Err(PolicyError::UnsafeLandingPath {
                    path: unsafe_landing.to_string()
                })
            );
        }
    }

    #[test]
    fn test_validate_rejects_sign_in_outside_auth_pages() {
        let policy = RoutePolicy::default();

        assert_eq!(
            policy.validate_gate_paths("/settings", "/my-applications"),
            Err(PolicyError::SignInNotAuthPage {
                path: "/settings".to_string(),
                class: "protected",
            })
        );
        assert_eq!(
            policy.validate_gate_paths("/login", "/my-applications"),
            Err(PolicyError::SignInNotAuthPage {
                path: "/login".to_string(),
                class: "public",
            })
        );
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let mut policy = RoutePolicy::default();
        policy
            .protected
            .push(RouteRule::new("/sign-in/admin", RoleSet::Any));

        assert!(matches!(
            policy.validate("/my-applications"),
            Err(PolicyError::OverlappingPrefix { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_relative_prefix() {
        let policy = RoutePolicy::new(
            vec![RouteRule::new("broker", RoleSet::Any)],
            vec!["/sign-in".to_string()],
        );

        assert!(matches!(
            policy.validate("/"),
            Err(PolicyError::InvalidPrefix { .. })
        ));
    }
}
