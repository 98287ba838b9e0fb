//! Identity backend over the Firebase identity toolkit REST API.
//!
//! DESIGN
//! ======
//! Sign-in, sign-up, password reset and e-mail verification are single REST
//! calls. The session (the ID token) lives only in this process; sign-out
//! forgets it locally. Verification never reads or writes the session. Every change is fanned out to subscribers while the session lock
//! is held, so a new subscriber always sees a consistent first value.

use std::sync::{Mutex, PoisonError};

use serde::Deserialize;

use super::backend::{EmailVerifier, IdentityBackend, IdentityEvents, Subscribers};
use super::error::CredentialError;
use super::types::{Credential, Identity, IdpProvider};
use crate::config::IdentityConfig;

struct FirebaseSession {
    identity: Identity,
    id_token: String,
}

pub struct FirebaseBackend {
    client: reqwest::Client,
    config: IdentityConfig,
    session: Mutex<Option<FirebaseSession>>,
    subscribers: Subscribers,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseBackend {
    #[must_use]
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            session: Mutex::new(None),
            subscribers: Subscribers::default(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{method}?key={}", self.config.toolkit_url, self.config.api_key)
    }

    /// Redirect URI the provider token is bound to.
    fn idp_request_uri(&self) -> String {
        format!("https://{}/__/auth/handler", self.config.auth_domain)
    }

    async fn post<T>(&self, method: &str, body: serde_json::Value) -> Result<T, CredentialError>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.endpoint(method))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(parse_error(&text).unwrap_or_else(|| CredentialError::Backend(format!("{status}: {text}"))));
        }
        serde_json::from_str(&text).map_err(|e| CredentialError::Backend(format!("unexpected response: {e}")))
    }

    /// Store the session and notify subscribers.
    fn establish(&self, resp: AuthResponse) -> Identity {
        let session = session_from_response(resp);
        let identity = session.identity.clone();
        let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(session);
        self.subscribers.publish(&Ok(Some(identity.clone())));
        identity
    }

    fn current_identity(current: Option<&FirebaseSession>) -> Option<Identity> {
        current.map(|s| s.identity.clone())
    }

    /// Bearer token for first-party API calls made on behalf of the signed-in user.
    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.id_token.clone())
            .filter(|t| !t.is_empty())
    }
}

#[async_trait::async_trait]
impl IdentityBackend for FirebaseBackend {
    fn subscribe(&self) -> IdentityEvents {
        let current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        self.subscribers.add(Ok(Self::current_identity(current.as_ref())))
    }

    async fn sign_in(&self, credential: Credential) -> Result<Identity, CredentialError> {
        let resp: AuthResponse = match &credential {
            Credential::EmailPassword { email, password } => {
                self.post(
                    "signInWithPassword",
                    serde_json::json!({ "email": email, "password": password, "returnSecureToken": true }),
                )
                .await?
            }
            Credential::IdpToken { provider, id_token } => {
                self.post(
                    "signInWithIdp",
                    serde_json::json!({
                        "postBody": idp_post_body(*provider, id_token),
                        "requestUri": self.idp_request_uri(),
                        "returnIdpCredential": true,
                        "returnSecureToken": true,
                    }),
                )
                .await?
            }
        };
        let identity = self.establish(resp);
        tracing::info!(uid = %identity.uid, "identity signed in");
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, CredentialError> {
        let resp: AuthResponse = self
            .post("signUp", serde_json::json!({ "email": email, "password": password, "returnSecureToken": true }))
            .await?;
        let identity = self.establish(resp);
        tracing::info!(uid = %identity.uid, "identity registered");
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), CredentialError> {
        let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *current = None;
        self.subscribers.publish(&Ok(None));
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), CredentialError> {
        let _: serde_json::Value = self
            .post("sendOobCode", serde_json::json!({ "requestType": "PASSWORD_RESET", "email": email }))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl EmailVerifier for FirebaseBackend {
    async fn confirm_email(&self, oob_code: &str) -> Result<(), CredentialError> {
        let _: serde_json::Value = self
            .post("update", serde_json::json!({ "oobCode": oob_code }))
            .await?;
        tracing::info!("email address verified");
        Ok(())
    }
}

pub(crate) fn idp_post_body(provider: IdpProvider, id_token: &str) -> String {
    format!("id_token={}&providerId={}", urlencoding::encode(id_token), provider.provider_id())
}

pub(crate) fn parse_error(body: &str) -> Option<CredentialError> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|env| CredentialError::from_backend_message(&env.error.message))
}

fn session_from_response(resp: AuthResponse) -> FirebaseSession {
    FirebaseSession {
        identity: Identity {
            uid: resp.local_id,
            email: resp.email.filter(|e| !e.is_empty()),
            display_name: resp.display_name.filter(|n| !n.is_empty()),
        },
        id_token: resp.id_token,
    }
}

#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;
