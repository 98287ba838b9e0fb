//! Auth support routes: backend configuration status, error details for the
//! sign-in error page, and e-mail verification links.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::identity::{CredentialError, EmailVerifier};
use crate::state::AppState;

const FALLBACK_DESCRIPTION: &str = "An unexpected authentication error occurred. Please try again later.";

#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    pub configured: bool,
    pub ready: bool,
    pub missing: Vec<&'static str>,
    pub timestamp: String,
}

pub async fn config_status(State(state): State<AppState>) -> Json<ConfigStatus> {
    let identity = &state.identity;
    Json(ConfigStatus {
        configured: identity.configured,
        ready: identity.ready,
        missing: identity.missing.clone(),
        timestamp: now_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub error: String,
    pub description: &'static str,
    pub timestamp: String,
}

pub async fn error_details(Query(query): Query<ErrorQuery>) -> Json<ErrorDetails> {
    let error = query
        .error
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| "default".to_owned());
    let description = describe_error(&error);
    Json(ErrorDetails { error, description, timestamp: now_rfc3339() })
}

/// User-facing text for an auth error code. Unknown codes get a generic message.
#[must_use]
pub fn describe_error(code: &str) -> &'static str {
    match code {
        "configuration" => {
            "The authentication service is not properly configured. Please contact the administrator."
        }
        "accessdenied" => {
            "You don't have permission to access this resource. If you believe this is an error, please contact support."
        }
        "verification" => {
            "Your verification link has expired or is invalid. Please request a new verification email."
        }
        "signin" => "We couldn't sign you in with the provided credentials. Please try a different method.",
        "oauthsignin" => {
            "There was a problem initiating the OAuth sign-in process. Please try again or use a different method."
        }
        "oauthcallback" => {
            "There was a problem processing the OAuth callback. Please try again or use a different method."
        }
        "oauthcreateaccount" => {
            "We couldn't create an account with your OAuth provider. Please try a different method."
        }
        "emailcreateaccount" => {
            "We couldn't create an account with your email. Please try a different email address."
        }
        "callback" => "There was a problem with the authentication callback. Please try again later.",
        "oauthaccountnotlinked" => {
            "This email is already associated with a different account. Please sign in using your original method."
        }
        "emailsignin" => "We couldn't send the sign-in email. Please check your email address and try again.",
        "credentialssignin" => "The email or password you entered is incorrect. Please try again.",
        "sessionrequired" => "You need to be signed in to access this page. Please sign in and try again.",
        _ => FALLBACK_DESCRIPTION,
    }
}

// =============================================================================
// E-MAIL VERIFICATION
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyOutcome {
    pub message: &'static str,
    pub success: bool,
}

/// `GET /api/auth/verify-email?token=<oob code>`, the link from the mail.
pub async fn verify_email_link(
    State(state): State<AppState>,
    Query(req): Query<VerifyRequest>,
) -> (StatusCode, Json<VerifyOutcome>) {
    verify_email(&state, req.token.as_deref()).await
}

/// `POST /api/auth/verify-email` with `{"token": "<oob code>"}`.
pub async fn verify_email_submit(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> (StatusCode, Json<VerifyOutcome>) {
    verify_email(&state, req.token.as_deref()).await
}

async fn verify_email(state: &AppState, token: Option<&str>) -> (StatusCode, Json<VerifyOutcome>) {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return outcome(StatusCode::BAD_REQUEST, "Verification token is required", false);
    };
    let Some(verifier) = &state.verifier else {
        tracing::warn!("email verification requested but identity backend is not configured");
        return outcome(StatusCode::SERVICE_UNAVAILABLE, "Email verification is not configured", false);
    };

    match verifier.confirm_email(token).await {
        Ok(()) => outcome(StatusCode::OK, "Email verified successfully", true),
        Err(CredentialError::InvalidActionCode) => {
            outcome(StatusCode::BAD_REQUEST, "Invalid or expired verification token", false)
        }
        Err(e) => {
            tracing::warn!(error = %e, "email verification failed");
            outcome(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during email verification",
                false,
            )
        }
    }
}

fn outcome(status: StatusCode, message: &'static str, success: bool) -> (StatusCode, Json<VerifyOutcome>) {
    (status, Json(VerifyOutcome { message, success }))
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
