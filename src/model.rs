//! Domain documents
//!
//! Three document shapes live in the store: the private intern profile,
//! its public leaderboard projection, and the curated rewards catalog.
//! Donation totals are maintained by external processes; this crate only
//! initializes them at zero.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::points::points_for;
use crate::store::Document;

/// Referral codes are 6 uppercase alphanumerics, generated once at profile
/// creation. Collisions across users are accepted as negligible and not
/// checked.
pub const REFERRAL_CODE_LEN: usize = 6;

const REFERRAL_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Private per-user record, document `tenant/{tenant}/users/{uid}/profile/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternProfile {
    pub name: String,
    pub referral_code: String,
    #[serde(default)]
    pub total_donations: f64,
    #[serde(default)]
    pub donations_count: u64,
    pub created_at: DateTime<Utc>,
}

impl InternProfile {
    /// Fresh profile for a first-ever session. Totals start at zero and are
    /// only ever advanced by the external donation recorder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referral_code: generate_referral_code(),
            total_donations: 0.0,
            donations_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn points(&self) -> u64 {
        points_for(self.total_donations)
    }

    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        serde_json::from_value(doc.data.clone()).map_err(|e| StoreError::Decode {
            path: doc.id.clone(),
            reason: e.to_string(),
        })
    }
}

/// Public denormalized projection of a profile, keyed by user id.
///
/// `name` is kept consistent with the profile only by the editor writing
/// both documents; there is no transactional guarantee, so the two copies
/// can diverge transiently on partial failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// User id; carried as the document id, not in the payload.
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    pub referral_code: String,
    #[serde(default)]
    pub total_donations: f64,
}

impl LeaderboardEntry {
    pub fn points(&self) -> u64 {
        points_for(self.total_donations)
    }

    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let mut entry: LeaderboardEntry =
            serde_json::from_value(doc.data.clone()).map_err(|e| StoreError::Decode {
                path: doc.id.clone(),
                reason: e.to_string(),
            })?;
        entry.id = doc.id.clone();
        Ok(entry)
    }
}

/// Catalog item unlockable at a points threshold. Read-only here; the
/// catalog is curated out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display glyph, e.g. "🎁".
    pub icon: String,
    pub points: u64,
}

impl Reward {
    pub fn unlocked_by(&self, points: u64) -> bool {
        points >= self.points
    }

    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let mut reward: Reward =
            serde_json::from_value(doc.data.clone()).map_err(|e| StoreError::Decode {
                path: doc.id.clone(),
                reason: e.to_string(),
            })?;
        reward.id = doc.id.clone();
        Ok(reward)
    }
}

/// Leaderboard render order: donations descending, ties broken by user id
/// ascending so equal totals always render the same way.
pub fn sort_leaderboard(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.total_donations
            .partial_cmp(&a.total_donations)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Rewards render order: cheapest threshold first, ties by id.
pub fn sort_rewards(rewards: &mut [Reward]) {
    rewards.sort_by(|a, b| a.points.cmp(&b.points).then_with(|| a.id.cmp(&b.id)));
}

/// Six independent uniform draws from the 36-character set.
pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    (0..REFERRAL_CODE_LEN)
        .map(|_| REFERRAL_CHARSET[rng.gen_range(0..REFERRAL_CHARSET.len())] as char)
        .collect()
}

/// Display name for a first session: local part of the email, or an
/// "Intern #NNNN" placeholder when the identity carries no email.
pub fn default_display_name(email: Option<&str>) -> String {
    match email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
    {
        Some(local) => local.to_string(),
        None => format!("Intern #{}", rand::thread_rng().gen_range(1000..=9999)),
    }
}
