//! Error taxonomy for identity operations.

use crate::config::ConfigError;

/// The backend rejected a sign-in, sign-up, reset or verification call, or
/// could not be reached.
///
/// Returned to the caller of that operation; never changes store state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("no account exists for this email")]
    UnknownAccount,
    #[error("an account already exists for this email")]
    EmailInUse,
    #[error("password too weak: {0}")]
    WeakPassword(String),
    #[error("account disabled")]
    UserDisabled,
    #[error("too many attempts, try again later")]
    TooManyAttempts,
    #[error("sign-in method not enabled")]
    OperationNotAllowed,
    #[error("identity provider rejected the token")]
    InvalidIdpResponse,
    #[error("verification code invalid or expired")]
    InvalidActionCode,
    #[error("network error: {0}")]
    Network(String),
    #[error("identity backend error: {0}")]
    Backend(String),
}

impl CredentialError {
    /// Map an identity toolkit error message (`"WEAK_PASSWORD : Password should be ..."`).
    #[must_use]
    pub fn from_backend_message(message: &str) -> Self {
        let (code, detail) = match message.split_once(':') {
            Some((code, detail)) => (code.trim(), detail.trim()),
            None => (message.trim(), ""),
        };
        match code {
            "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "MISSING_PASSWORD" => Self::InvalidCredentials,
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => Self::UnknownAccount,
            "EMAIL_EXISTS" => Self::EmailInUse,
            "WEAK_PASSWORD" => Self::WeakPassword(detail.to_owned()),
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            "INVALID_IDP_RESPONSE" => Self::InvalidIdpResponse,
            "INVALID_OOB_CODE" | "EXPIRED_OOB_CODE" => Self::InvalidActionCode,
            _ => Self::Backend(message.trim().to_owned()),
        }
    }

    /// Short code the auth-error endpoint understands.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEmail | Self::InvalidCredentials | Self::UnknownAccount => "credentialssignin",
            Self::EmailInUse | Self::WeakPassword(_) => "emailcreateaccount",
            Self::UserDisabled => "accessdenied",
            Self::InvalidIdpResponse => "oauthcallback",
            Self::InvalidActionCode => "verification",
            Self::OperationNotAllowed => "oauthsignin",
            Self::TooManyAttempts | Self::Network(_) | Self::Backend(_) => "signin",
        }
    }
}

impl From<reqwest::Error> for CredentialError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// The backend's change-notification stream failed.
///
/// The store treats this as a transition to signed out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    #[error("identity stream failed: {0}")]
    Stream(String),
    #[error("identity stream closed")]
    Closed,
}

/// Operation-level failure returned by the store and service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("identity observer has stopped")]
    ObserverStopped,
}

impl AuthError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Credential(e) => e.error_code(),
            Self::ObserverStopped => "callback",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
