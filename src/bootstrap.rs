//! First-login profile bootstrapper
//!
//! A profile exists iff its account has authenticated at least once; it is
//! created lazily here on the first session. Creation is two separate
//! writes (private profile, then public leaderboard entry) with no rollback:
//! if the second write fails the profile exists without its projection, and
//! the error is returned so the caller can tell the user.

use tracing::info;

use crate::error::StoreError;
use crate::gateway::Identity;
use crate::model::{default_display_name, InternProfile, LeaderboardEntry};
use crate::store::{leaderboard_doc, profile_doc, DocumentStore};

/// Returns the existing profile, or creates profile + leaderboard entry for
/// a first-ever session.
pub async fn ensure_profile(
    store: &dyn DocumentStore,
    tenant: &str,
    identity: &Identity,
) -> Result<InternProfile, StoreError> {
    let path = profile_doc(tenant, &identity.user_id);

    if let Some(doc) = store.get_doc(&path).await? {
        return InternProfile::from_document(&doc);
    }

    let profile = InternProfile::new(default_display_name(identity.email.as_deref()));
    store
        .create_doc(&path, serde_json::to_value(&profile)?)
        .await?;

    let entry = LeaderboardEntry {
        id: identity.user_id.clone(),
        name: profile.name.clone(),
        referral_code: profile.referral_code.clone(),
        total_donations: profile.total_donations,
    };
    store
        .create_doc(
            &leaderboard_doc(tenant, &identity.user_id),
            serde_json::to_value(&entry)?,
        )
        .await?;

    info!(user = %identity.user_id, name = %profile.name, "bootstrapped profile");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::store::DocumentStore;

    fn identity(email: Option<&str>) -> Identity {
        Identity {
            user_id: "u-1".to_string(),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_first_session_creates_both_documents() {
        let store = MemoryStore::new();
        let profile = ensure_profile(&store, "t", &identity(Some("jane.doe@x.com")))
            .await
            .unwrap();

        assert_eq!(profile.name, "jane.doe");
        assert_eq!(profile.total_donations, 0.0);
        assert_eq!(profile.donations_count, 0);

        let stored = store
            .get_doc(&profile_doc("t", "u-1"))
            .await
            .unwrap()
            .expect("profile document");
        assert_eq!(stored.data["name"], "jane.doe");

        let entry = store
            .get_doc(&leaderboard_doc("t", "u-1"))
            .await
            .unwrap()
            .expect("leaderboard entry");
        assert_eq!(entry.data["name"], "jane.doe");
        assert_eq!(entry.data["referral_code"], profile.referral_code.as_str());
        assert!(entry.data.get("id").is_none());
    }

    #[tokio::test]
    async fn test_second_session_is_a_no_op() {
        let store = MemoryStore::new();
        let first = ensure_profile(&store, "t", &identity(Some("jane.doe@x.com")))
            .await
            .unwrap();
        let second = ensure_profile(&store, "t", &identity(Some("jane.doe@x.com")))
            .await
            .unwrap();

        // Referral code is generated once at creation; a repeat session must
        // not regenerate it.
        assert_eq!(first.referral_code, second.referral_code);
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_no_email_gets_placeholder_name() {
        let store = MemoryStore::new();
        let profile = ensure_profile(&store, "t", &identity(None)).await.unwrap();
        assert!(profile.name.starts_with("Intern #"));
    }
}
