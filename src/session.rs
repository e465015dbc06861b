//! Auth session manager
//!
//! Wraps the gateway behind a watch channel so every component observes the
//! same identity stream: the current value immediately on subscribe, then
//! every sign-in/sign-out transition. No state transition happens on a
//! failed sign-in or sign-up.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::gateway::{AuthGateway, Identity};

pub struct SessionManager {
    gateway: Arc<dyn AuthGateway>,
    identity: watch::Sender<Option<Identity>>,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        let (identity, _) = watch::channel(None);
        Self { gateway, identity }
    }

    /// Identity stream: `Some` while authenticated, `None` otherwise.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = self.gateway.create_account(email, password).await?;
        info!(user = %identity.user_id, "account created");
        self.identity.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = self.gateway.authenticate(email, password).await?;
        info!(user = %identity.user_id, "signed in");
        self.identity.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    /// One-shot token restoration at startup. Failure is logged and
    /// otherwise ignored; the caller falls through to interactive sign-in.
    pub async fn restore(&self, token: &str) -> Option<Identity> {
        match self.gateway.authenticate_with_token(token).await {
            Ok(identity) => {
                info!(user = %identity.user_id, "session restored from token");
                self.identity.send_replace(Some(identity.clone()));
                Some(identity)
            }
            Err(e) => {
                warn!("token session restoration failed: {e}");
                None
            }
        }
    }

    pub async fn sign_out(&self) {
        self.gateway.end_session().await;
        self.identity.send_replace(None);
        info!("signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryAuthGateway;

    #[tokio::test]
    async fn test_identity_stream_transitions() {
        let gateway = Arc::new(MemoryAuthGateway::new());
        let session = SessionManager::new(gateway);
        let rx = session.subscribe();

        assert!(rx.borrow().is_none());

        session.sign_up("a@x.com", "hunter22").await.unwrap();
        assert!(rx.borrow().is_some());

        session.sign_out().await;
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_does_not_transition() {
        let gateway = Arc::new(MemoryAuthGateway::new());
        let session = SessionManager::new(gateway);

        assert!(session.sign_in("ghost@x.com", "nope-nope").await.is_err());
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_restore_is_best_effort() {
        let gateway = Arc::new(MemoryAuthGateway::new());
        gateway.create_account("a@x.com", "hunter22").await.unwrap();
        let token = gateway.issue_token("a@x.com").unwrap();

        let session = SessionManager::new(gateway);
        assert!(session.restore("bogus").await.is_none());
        assert!(session.current().is_none());

        assert!(session.restore(&token).await.is_some());
        assert!(session.current().is_some());
    }
}
