//! Identity, role and snapshot types shared by the store and its consumers.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed-in principal as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Standard,
}

// =============================================================================
// ADMIN ALLOW-LIST
// =============================================================================

/// E-mail addresses granted the admin role. Matching ignores case.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_ascii_lowercase())
    }

    /// Role for the given identity. Absent identities are never admin.
    #[must_use]
    pub fn role_for(&self, identity: Option<&Identity>) -> Role {
        match identity.and_then(|i| i.email.as_deref()) {
            Some(email) if self.contains(email) => Role::Admin,
            _ => Role::Standard,
        }
    }
}

// =============================================================================
// AUTH STATE
// =============================================================================

/// Snapshot of the store.
///
/// `loading` is true until the backend has delivered its first identity.
/// While loading, `identity == None` means "unknown", not "signed out".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    pub role: Role,
    pub loading: bool,
}

impl AuthState {
    #[must_use]
    pub fn loading() -> Self {
        Self { identity: None, role: Role::Standard, loading: true }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { identity: None, role: Role::Standard, loading: false }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.identity.is_some() && self.role == Role::Admin
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdpProvider {
    Google,
}

impl IdpProvider {
    #[must_use]
    pub fn provider_id(self) -> &'static str {
        match self {
            Self::Google => "google.com",
        }
    }
}

/// What the caller hands to `sign_in`.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    EmailPassword { email: String, password: String },
    /// An ID token already obtained from an external provider's consent flow.
    IdpToken { provider: IdpProvider, id_token: String },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailPassword { email, .. } => f
                .debug_struct("EmailPassword")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Self::IdpToken { provider, .. } => f
                .debug_struct("IdpToken")
                .field("provider", provider)
                .field("id_token", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
