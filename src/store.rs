//! Document store seam
//!
//! All persistence is delegated to the external document platform; this
//! module is the narrow surface the rest of the crate is allowed to touch.
//! Documents are addressed by the path scheme `tenant/{tenant}/...`:
//!
//! - private profile:   `tenant/{tenant}/users/{uid}/profile/data`
//! - leaderboard entry: `tenant/{tenant}/public/data/leaderboard/{uid}`
//! - rewards catalog:   `tenant/{tenant}/public/data/rewards/{rid}`
//!
//! Watches deliver the full current snapshot immediately on subscribe and
//! again on every subsequent change. Delivery failures are logged by the
//! implementation and the last known snapshot stays in place.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::StoreError;

/// A stored document: id unique within its collection, plus the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Path of a collection of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            doc_id: id.into(),
        }
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub doc_id: String,
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.doc_id)
    }
}

/// Well-known id of the single document inside a profile collection.
pub const PROFILE_DOC_ID: &str = "data";

/// The single-document collection holding a user's private profile.
pub fn profile_collection(tenant: &str, user_id: &str) -> CollectionPath {
    CollectionPath(format!("tenant/{tenant}/users/{user_id}/profile"))
}

/// `tenant/{tenant}/users/{uid}/profile/data`
pub fn profile_doc(tenant: &str, user_id: &str) -> DocPath {
    profile_collection(tenant, user_id).doc(PROFILE_DOC_ID)
}

pub fn leaderboard_collection(tenant: &str) -> CollectionPath {
    CollectionPath(format!("tenant/{tenant}/public/data/leaderboard"))
}

/// `tenant/{tenant}/public/data/leaderboard/{uid}`
pub fn leaderboard_doc(tenant: &str, user_id: &str) -> DocPath {
    leaderboard_collection(tenant).doc(user_id)
}

pub fn rewards_collection(tenant: &str) -> CollectionPath {
    CollectionPath(format!("tenant/{tenant}/public/data/rewards"))
}

/// `tenant/{tenant}/public/data/rewards/{rid}`
pub fn rewards_doc(tenant: &str, reward_id: &str) -> DocPath {
    rewards_collection(tenant).doc(reward_id)
}

/// Live read subscription on one collection.
///
/// Wraps a watch receiver whose value is the full collection snapshot.
/// Dropping the handle releases the subscription (and stops the refresh
/// task for store implementations that need one).
pub struct CollectionWatch {
    rx: watch::Receiver<Vec<Document>>,
    task: Option<JoinHandle<()>>,
}

impl CollectionWatch {
    pub fn new(rx: watch::Receiver<Vec<Document>>) -> Self {
        Self { rx, task: None }
    }

    pub fn with_task(rx: watch::Receiver<Vec<Document>>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Current full snapshot.
    pub fn snapshot(&self) -> Vec<Document> {
        self.rx.borrow().clone()
    }

    /// Waits for the next delivery. Returns `false` once the store side is
    /// gone and no further deliveries can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl Drop for CollectionWatch {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Generic document-store interface over the external platform.
///
/// `create_doc` is last-write-wins (the platform's set semantics);
/// `update_doc` merges top-level fields into an existing document and
/// fails with `NotFound` when there is none.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    async fn create_doc(&self, path: &DocPath, data: Value) -> Result<(), StoreError>;

    async fn update_doc(&self, path: &DocPath, fields: Value) -> Result<(), StoreError>;

    async fn watch_collection(&self, path: &CollectionPath) -> CollectionWatch;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_doc_path() {
        let path = profile_doc("acme", "u-42");
        assert_eq!(path.to_string(), "tenant/acme/users/u-42/profile/data");
    }

    #[test]
    fn test_public_paths() {
        assert_eq!(
            leaderboard_doc("acme", "u-42").to_string(),
            "tenant/acme/public/data/leaderboard/u-42"
        );
        assert_eq!(
            rewards_collection("acme").to_string(),
            "tenant/acme/public/data/rewards"
        );
        assert_eq!(
            rewards_doc("acme", "hoodie").to_string(),
            "tenant/acme/public/data/rewards/hoodie"
        );
    }
}
