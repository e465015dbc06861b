//! Profile editor
//!
//! The display name is the only editable field, and it lives in two places:
//! the private profile and the public leaderboard entry. The rename writes
//! both, sequentially and without a transaction; a failure of either write
//! is returned (a partially applied rename is not undone).

use tracing::info;

use crate::error::StoreError;
use crate::store::{leaderboard_doc, profile_doc, DocumentStore};

/// Renames the intern. A name that is empty after trimming is a no-op and
/// returns `Ok(None)` without touching either document; otherwise both
/// documents are updated with the trimmed name and it is returned.
pub async fn rename(
    store: &dyn DocumentStore,
    tenant: &str,
    user_id: &str,
    new_name: &str,
) -> Result<Option<String>, StoreError> {
    let trimmed = new_name.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let fields = serde_json::json!({ "name": trimmed });
    store
        .update_doc(&profile_doc(tenant, user_id), fields.clone())
        .await?;
    store
        .update_doc(&leaderboard_doc(tenant, user_id), fields)
        .await?;

    info!(user = %user_id, name = %trimmed, "renamed");
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::ensure_profile;
    use crate::gateway::Identity;
    use crate::memory_store::MemoryStore;

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        let identity = Identity {
            user_id: "u-1".to_string(),
            email: Some("jane.doe@x.com".to_string()),
        };
        ensure_profile(&store, "t", &identity).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_rename_updates_both_documents() {
        let store = seeded_store().await;

        let applied = rename(&store, "t", "u-1", "  Alice B  ").await.unwrap();
        assert_eq!(applied.as_deref(), Some("Alice B"));

        let profile = store
            .get_doc(&profile_doc("t", "u-1"))
            .await
            .unwrap()
            .unwrap();
        let entry = store
            .get_doc(&leaderboard_doc("t", "u-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.data["name"], "Alice B");
        assert_eq!(entry.data["name"], "Alice B");
    }

    #[tokio::test]
    async fn test_whitespace_rename_is_a_no_op() {
        let store = seeded_store().await;
        let before_profile = store
            .get_doc(&profile_doc("t", "u-1"))
            .await
            .unwrap()
            .unwrap();
        let before_entry = store
            .get_doc(&leaderboard_doc("t", "u-1"))
            .await
            .unwrap()
            .unwrap();

        let applied = rename(&store, "t", "u-1", "   \t ").await.unwrap();
        assert!(applied.is_none());

        let after_profile = store
            .get_doc(&profile_doc("t", "u-1"))
            .await
            .unwrap()
            .unwrap();
        let after_entry = store
            .get_doc(&leaderboard_doc("t", "u-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before_profile, after_profile);
        assert_eq!(before_entry, after_entry);
    }

    #[tokio::test]
    async fn test_rename_without_profile_fails() {
        let store = MemoryStore::new();
        let err = rename(&store, "t", "ghost", "Alice").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
