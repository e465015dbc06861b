//! Dashboard orchestrator
//!
//! Ties the session stream to the data plane: a none→authenticated
//! transition bootstraps the profile (once) and attaches the three live
//! feeds; authenticated→none detaches them and clears all view state.
//! Gateway and store handles are injected at construction; nothing here is
//! a process-wide global.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::sync::Mutex;
use tracing::warn;

use crate::bootstrap::ensure_profile;
use crate::editor;
use crate::error::Error;
use crate::feeds::{FeedState, Feeds};
use crate::gateway::{AuthGateway, Identity};
use crate::model::{InternProfile, LeaderboardEntry, Reward};
use crate::session::SessionManager;
use crate::store::DocumentStore;

pub struct Dashboard {
    store: Arc<dyn DocumentStore>,
    tenant: String,
    session: SessionManager,
    state: Arc<FeedState>,
    feeds: Mutex<Option<Feeds>>,
}

impl Dashboard {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        store: Arc<dyn DocumentStore>,
        tenant: impl Into<String>,
    ) -> Self {
        Self {
            store,
            tenant: tenant.into(),
            session: SessionManager::new(gateway),
            state: FeedState::new(),
            feeds: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.current()
    }

    /// Identity stream; `None` while signed out.
    pub fn session_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    pub fn profile(&self) -> watch::Receiver<Option<InternProfile>> {
        self.state.profile()
    }

    pub fn leaderboard(&self) -> watch::Receiver<Vec<LeaderboardEntry>> {
        self.state.leaderboard()
    }

    pub fn rewards(&self) -> watch::Receiver<Vec<Reward>> {
        self.state.rewards()
    }

    /// Sign-up, then bootstrap + feed attach. An `Error::Auth` means no
    /// session was established; an `Error::Store` means the session is live
    /// but the profile bootstrap failed (degraded, feeds still attached).
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), Error> {
        let identity = self.session.sign_up(email, password).await?;
        self.on_authenticated(&identity).await
    }

    /// Sign-in; same error contract as [`Dashboard::sign_up`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), Error> {
        let identity = self.session.sign_in(email, password).await?;
        self.on_authenticated(&identity).await
    }

    /// One-shot silent sign-in from a pre-provisioned token. Best-effort:
    /// returns whether a session was established; bootstrap problems are
    /// logged, not returned, since no login surface exists yet at startup.
    pub async fn restore(&self, token: &str) -> bool {
        let Some(identity) = self.session.restore(token).await else {
            return false;
        };
        if let Err(e) = self.on_authenticated(&identity).await {
            warn!("bootstrap after token restore: {e}");
        }
        true
    }

    /// Ends the session, detaches all live feeds, and clears every piece of
    /// locally held profile/leaderboard/rewards state.
    pub async fn sign_out(&self) {
        if let Some(feeds) = self.feeds.lock().await.take() {
            feeds.detach().await;
        }
        self.state.clear();
        self.session.sign_out().await;
    }

    /// Renames the signed-in intern in both documents. The profile feed
    /// re-renders the new name; there is no optimistic local echo to roll
    /// back on failure.
    pub async fn rename(&self, new_name: &str) -> Result<Option<String>, Error> {
        let identity = self.session.current().ok_or(Error::NoSession)?;
        let applied =
            editor::rename(self.store.as_ref(), &self.tenant, &identity.user_id, new_name).await?;
        Ok(applied)
    }

    async fn on_authenticated(&self, identity: &Identity) -> Result<(), Error> {
        let mut feeds = self.feeds.lock().await;
        if let Some(previous) = feeds.take() {
            // Re-login without an explicit logout; drop the stale session's
            // subscriptions before attaching fresh ones.
            previous.detach().await;
            self.state.clear();
        }

        let bootstrapped = ensure_profile(self.store.as_ref(), &self.tenant, identity).await;

        *feeds = Some(
            Feeds::attach(
                self.store.as_ref(),
                &self.tenant,
                &identity.user_id,
                self.state.clone(),
            )
            .await,
        );

        bootstrapped.map(|_| ()).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryAuthGateway;
    use crate::memory_store::MemoryStore;
    use crate::store::leaderboard_doc;
    use serde_json::json;
    use std::time::Duration;

    fn local_dashboard() -> (Arc<MemoryAuthGateway>, MemoryStore, Dashboard) {
        let gateway = Arc::new(MemoryAuthGateway::new());
        let store = MemoryStore::new();
        let dash = Dashboard::new(gateway.clone(), Arc::new(store.clone()), "t");
        (gateway, store, dash)
    }

    async fn wait_until<T>(
        rx: &mut watch::Receiver<T>,
        pred: impl Fn(&T) -> bool,
        what: &str,
    ) {
        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if pred(&rx.borrow()) {
                    return;
                }
                rx.changed().await.expect("state sender dropped");
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
    }

    #[tokio::test]
    async fn test_sign_up_bootstraps_and_feeds_deliver() {
        let (_gateway, _store, dash) = local_dashboard();

        dash.sign_up("jane.doe@x.com", "hunter22").await.unwrap();

        let mut profile_rx = dash.profile();
        wait_until(&mut profile_rx, |p| p.is_some(), "profile").await;
        assert_eq!(profile_rx.borrow().as_ref().unwrap().name, "jane.doe");

        let mut lb_rx = dash.leaderboard();
        wait_until(&mut lb_rx, |l| l.len() == 1, "leaderboard entry").await;
        assert_eq!(lb_rx.borrow()[0].name, "jane.doe");
        assert_eq!(lb_rx.borrow()[0].id, dash.identity().unwrap().user_id);
    }

    #[tokio::test]
    async fn test_rename_reflected_in_both_feeds() {
        let (_gateway, _store, dash) = local_dashboard();
        dash.sign_up("jane.doe@x.com", "hunter22").await.unwrap();

        let applied = dash.rename("Alice B").await.unwrap();
        assert_eq!(applied.as_deref(), Some("Alice B"));

        let mut profile_rx = dash.profile();
        wait_until(
            &mut profile_rx,
            |p| p.as_ref().map(|p| p.name.as_str()) == Some("Alice B"),
            "renamed profile",
        )
        .await;

        let mut lb_rx = dash.leaderboard();
        wait_until(
            &mut lb_rx,
            |l| l.first().map(|e| e.name.as_str()) == Some("Alice B"),
            "renamed leaderboard entry",
        )
        .await;
    }

    #[tokio::test]
    async fn test_sign_out_clears_state_and_detaches() {
        let (_gateway, store, dash) = local_dashboard();
        dash.sign_up("jane.doe@x.com", "hunter22").await.unwrap();

        let mut profile_rx = dash.profile();
        wait_until(&mut profile_rx, |p| p.is_some(), "profile").await;

        dash.sign_out().await;
        assert!(dash.identity().is_none());
        assert!(dash.profile().borrow().is_none());
        assert!(dash.leaderboard().borrow().is_empty());
        assert!(dash.rewards().borrow().is_empty());

        // Writes after logout no longer reach the (detached) view state.
        store
            .create_doc(
                &leaderboard_doc("t", "u9"),
                json!({ "name": "late", "referral_code": "AAAAAA", "total_donations": 1.0 }),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(dash.leaderboard().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_rename_requires_session() {
        let (_gateway, _store, dash) = local_dashboard();
        assert!(matches!(
            dash.rename("Alice").await.unwrap_err(),
            Error::NoSession
        ));
    }

    #[tokio::test]
    async fn test_token_restore_attaches_feeds() {
        let (gateway, _store, dash) = local_dashboard();
        gateway
            .create_account("jane.doe@x.com", "hunter22")
            .await
            .unwrap();
        let token = gateway.issue_token("jane.doe@x.com").unwrap();

        assert!(!dash.restore("bogus").await);
        assert!(dash.identity().is_none());

        assert!(dash.restore(&token).await);
        let mut profile_rx = dash.profile();
        wait_until(&mut profile_rx, |p| p.is_some(), "restored profile").await;
    }
}
