//! Live data subscriptions
//!
//! Three independent long-lived feeds run while a session is authenticated:
//! the own profile, the public leaderboard, and the rewards catalog. Each
//! maps raw store snapshots into typed view state on its own task; there is
//! no ordering between them. A document that fails to decode is logged and
//! skipped, leaving the last good value in place. Detaching aborts all
//! three tasks.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::model::{
    sort_leaderboard, sort_rewards, InternProfile, LeaderboardEntry, Reward,
};
use crate::store::{
    leaderboard_collection, profile_collection, rewards_collection, CollectionWatch, Document,
    DocumentStore, PROFILE_DOC_ID,
};

/// The view-facing state channels. Owned by the orchestrator so they
/// outlive individual sessions; feeds write into them while attached and
/// `clear` resets them at logout.
pub struct FeedState {
    profile: watch::Sender<Option<InternProfile>>,
    leaderboard: watch::Sender<Vec<LeaderboardEntry>>,
    rewards: watch::Sender<Vec<Reward>>,
}

impl FeedState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            profile: watch::channel(None).0,
            leaderboard: watch::channel(Vec::new()).0,
            rewards: watch::channel(Vec::new()).0,
        })
    }

    /// `None` while the profile is absent or still loading.
    pub fn profile(&self) -> watch::Receiver<Option<InternProfile>> {
        self.profile.subscribe()
    }

    /// Sorted descending by donations, ties by user id.
    pub fn leaderboard(&self) -> watch::Receiver<Vec<LeaderboardEntry>> {
        self.leaderboard.subscribe()
    }

    /// Sorted ascending by points threshold.
    pub fn rewards(&self) -> watch::Receiver<Vec<Reward>> {
        self.rewards.subscribe()
    }

    /// Drops all locally held view state (logout).
    pub fn clear(&self) {
        self.profile.send_replace(None);
        self.leaderboard.send_replace(Vec::new());
        self.rewards.send_replace(Vec::new());
    }
}

/// Handle over the three running feed tasks for one session.
pub struct Feeds {
    tasks: Vec<JoinHandle<()>>,
}

impl Feeds {
    pub async fn attach(
        store: &dyn DocumentStore,
        tenant: &str,
        user_id: &str,
        state: Arc<FeedState>,
    ) -> Feeds {
        let profile_watch = store
            .watch_collection(&profile_collection(tenant, user_id))
            .await;
        let leaderboard_watch = store.watch_collection(&leaderboard_collection(tenant)).await;
        let rewards_watch = store.watch_collection(&rewards_collection(tenant)).await;

        let tasks = vec![
            tokio::spawn(run_profile_feed(profile_watch, state.clone())),
            tokio::spawn(run_leaderboard_feed(leaderboard_watch, state.clone())),
            tokio::spawn(run_rewards_feed(rewards_watch, state)),
        ];
        Feeds { tasks }
    }

    /// Tears the subscriptions down; no further state updates arrive after
    /// this resolves.
    pub async fn detach(self) {
        for task in &self.tasks {
            task.abort();
        }
        let _ = futures::future::join_all(self.tasks).await;
    }
}

async fn run_profile_feed(mut watch: CollectionWatch, state: Arc<FeedState>) {
    loop {
        apply_profile(&watch.snapshot(), &state);
        if !watch.changed().await {
            break;
        }
    }
}

fn apply_profile(docs: &[Document], state: &FeedState) {
    match docs.iter().find(|d| d.id == PROFILE_DOC_ID) {
        // Absent means "still loading", never an error.
        None => {
            state.profile.send_replace(None);
        }
        Some(doc) => match InternProfile::from_document(doc) {
            Ok(profile) => {
                state.profile.send_replace(Some(profile));
            }
            Err(e) => warn!("profile feed: {e}"),
        },
    }
}

async fn run_leaderboard_feed(mut watch: CollectionWatch, state: Arc<FeedState>) {
    loop {
        let mut entries: Vec<LeaderboardEntry> = watch
            .snapshot()
            .iter()
            .filter_map(|doc| match LeaderboardEntry::from_document(doc) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("leaderboard feed: {e}");
                    None
                }
            })
            .collect();
        sort_leaderboard(&mut entries);
        state.leaderboard.send_replace(entries);

        if !watch.changed().await {
            break;
        }
    }
}

async fn run_rewards_feed(mut watch: CollectionWatch, state: Arc<FeedState>) {
    loop {
        let mut rewards: Vec<Reward> = watch
            .snapshot()
            .iter()
            .filter_map(|doc| match Reward::from_document(doc) {
                Ok(reward) => Some(reward),
                Err(e) => {
                    warn!("rewards feed: {e}");
                    None
                }
            })
            .collect();
        sort_rewards(&mut rewards);
        state.rewards.send_replace(rewards);

        if !watch.changed().await {
            break;
        }
    }
}
