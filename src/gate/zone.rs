//! Route zone classification from the request path.

const ADMIN_PREFIX: &str = "/admin";
const USER_PREFIX: &str = "/dashboard";
const AUTH_PREFIXES: [&str; 2] = ["/auth/login", "/auth/register"];

/// Which part of the site a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteZone {
    Public,
    /// Sign-in and registration pages.
    Auth,
    /// Signed-in student area.
    User,
    /// Signed-in admin area.
    Admin,
}

impl RouteZone {
    #[must_use]
    pub fn classify(path: &str) -> Self {
        if has_prefix(path, ADMIN_PREFIX) {
            Self::Admin
        } else if has_prefix(path, USER_PREFIX) {
            Self::User
        } else if AUTH_PREFIXES.iter().any(|p| has_prefix(path, p)) {
            Self::Auth
        } else {
            Self::Public
        }
    }

    /// Whether the gate refuses this zone to callers without a summary cookie.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::User | Self::Admin)
    }
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/x`, not `/administer`.
pub(crate) fn has_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
#[path = "zone_test.rs"]
mod tests;
