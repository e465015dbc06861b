//! Auth gateway seam
//!
//! Email/password identity is delegated to the external platform. The REST
//! implementation speaks the identity-toolkit endpoints; the in-memory one
//! backs tests and local mode with the same observable contract.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use rand::RngCore;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// An authenticated identity as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Token-based session restoration. Best-effort; callers log failures
    /// instead of surfacing them.
    async fn authenticate_with_token(&self, token: &str) -> Result<Identity, AuthError>;

    async fn end_session(&self);
}

// ============================================================================
// REST GATEWAY
// ============================================================================

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct RestAuthGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestAuthGateway {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url,
            action,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn post_credentials(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<Identity, AuthError> {
        let resp = self
            .client
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let parsed: SignInResponse = resp
                .json()
                .await
                .map_err(|e| AuthError::Gateway(format!("malformed gateway response: {e}")))?;
            return Ok(Identity {
                user_id: parsed.local_id,
                email: parsed.email,
            });
        }

        let body = resp.text().await.unwrap_or_default();
        debug!(%status, "auth gateway rejected {action}");
        Err(map_gateway_error(&body))
    }
}

/// Maps the gateway's error codes to the taxonomy; unknown codes pass
/// through so the login surface can show whatever the gateway said.
fn map_gateway_error(body: &str) -> AuthError {
    let message = serde_json::from_str::<GatewayErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match message.split(':').next().unwrap_or("").trim() {
        "EMAIL_EXISTS" => AuthError::DuplicateAccount,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AuthError::InvalidCredentials
        }
        _ => AuthError::Gateway(message),
    }
}

#[async_trait::async_trait]
impl AuthGateway for RestAuthGateway {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.post_credentials(
            "signUp",
            json!({ "email": email, "password": password, "returnSecureToken": true }),
        )
        .await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.post_credentials(
            "signInWithPassword",
            json!({ "email": email, "password": password, "returnSecureToken": true }),
        )
        .await
    }

    async fn authenticate_with_token(&self, token: &str) -> Result<Identity, AuthError> {
        self.post_credentials(
            "signInWithCustomToken",
            json!({ "token": token, "returnSecureToken": true }),
        )
        .await
    }

    async fn end_session(&self) {
        // Sessions are client-held; nothing to revoke on the gateway.
    }
}

// ============================================================================
// IN-MEMORY GATEWAY
// ============================================================================

struct Account {
    user_id: String,
    email: String,
    password_digest: String,
}

/// In-process gateway for tests and `--local` mode. Accounts live for the
/// process lifetime; passwords are stored as SHA-256 digests.
#[derive(Default)]
pub struct MemoryAuthGateway {
    /// Keyed by lowercased email.
    accounts: RwLock<HashMap<String, Account>>,
    /// Pre-provisioned session tokens, keyed by token.
    tokens: RwLock<HashMap<String, Identity>>,
}

impl MemoryAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a session token for an existing account, as the hosting
    /// environment would pre-provision one.
    pub fn issue_token(&self, email: &str) -> Option<String> {
        let accounts = self.accounts.read();
        let account = accounts.get(&email.to_lowercase())?;
        let identity = Identity {
            user_id: account.user_id.clone(),
            email: Some(account.email.clone()),
        };
        drop(accounts);

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.tokens.write().insert(token.clone(), identity);
        Some(token)
    }

    fn digest(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }
}

#[async_trait::async_trait]
impl AuthGateway for MemoryAuthGateway {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Gateway("a valid email is required".to_string()));
        }
        if password.len() < 6 {
            return Err(AuthError::Gateway(
                "password must be at least 6 characters".to_string(),
            ));
        }

        let mut accounts = self.accounts.write();
        let key = email.to_lowercase();
        if accounts.contains_key(&key) {
            return Err(AuthError::DuplicateAccount);
        }

        let account = Account {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_digest: Self::digest(password),
        };
        let identity = Identity {
            user_id: account.user_id.clone(),
            email: Some(account.email.clone()),
        };
        accounts.insert(key, account);
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let accounts = self.accounts.read();
        let account = accounts
            .get(&email.trim().to_lowercase())
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password_digest != Self::digest(password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Identity {
            user_id: account.user_id.clone(),
            email: Some(account.email.clone()),
        })
    }

    async fn authenticate_with_token(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .read()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn end_session(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_and_signin() {
        let gw = MemoryAuthGateway::new();
        let created = gw
            .create_account("jane.doe@x.com", "hunter22")
            .await
            .unwrap();
        let signed_in = gw.authenticate("jane.doe@x.com", "hunter22").await.unwrap();
        assert_eq!(created, signed_in);
        assert_eq!(signed_in.email.as_deref(), Some("jane.doe@x.com"));
    }

    #[tokio::test]
    async fn test_duplicate_account() {
        let gw = MemoryAuthGateway::new();
        gw.create_account("a@x.com", "hunter22").await.unwrap();
        let err = gw.create_account("A@X.COM", "hunter22").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let gw = MemoryAuthGateway::new();
        gw.create_account("a@x.com", "hunter22").await.unwrap();
        let err = gw.authenticate("a@x.com", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_token_restoration() {
        let gw = MemoryAuthGateway::new();
        let identity = gw.create_account("a@x.com", "hunter22").await.unwrap();
        let token = gw.issue_token("a@x.com").unwrap();
        let restored = gw.authenticate_with_token(&token).await.unwrap();
        assert_eq!(restored, identity);

        let err = gw.authenticate_with_token("bogus").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_gateway_error_mapping() {
        let dup = map_gateway_error(r#"{"error":{"message":"EMAIL_EXISTS"}}"#);
        assert!(matches!(dup, AuthError::DuplicateAccount));

        let bad = map_gateway_error(r#"{"error":{"message":"INVALID_LOGIN_CREDENTIALS"}}"#);
        assert!(matches!(bad, AuthError::InvalidCredentials));

        let weak =
            map_gateway_error(r#"{"error":{"message":"WEAK_PASSWORD : Password too short"}}"#);
        match weak {
            AuthError::Gateway(msg) => assert!(msg.starts_with("WEAK_PASSWORD")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
