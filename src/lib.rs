//! Intern Rewards - track fundraising totals and unlock rewards
//!
//! Interns sign in with email/password, see their fundraising dashboard,
//! and rank on a cross-user leaderboard. Persistence, real-time sync, and
//! authentication are delegated to an external managed platform reached
//! through the [`store::DocumentStore`] and [`gateway::AuthGateway`] traits.
//!
//! # How it works
//!
//! 1. A session starts via sign-up, sign-in, or a pre-provisioned token
//! 2. The first-ever session bootstraps a private profile plus its public
//!    leaderboard projection (default name, fresh referral code, zeroed
//!    donation totals)
//! 3. Three live subscriptions stream the own profile, the leaderboard,
//!    and the rewards catalog into view state while authenticated
//! 4. Points derive as `floor(total_donations / 10)`; a reward unlocks
//!    when points reach its threshold
//! 5. Renaming writes the trimmed name to both copies; logout detaches the
//!    subscriptions and clears all view state
//!
//! Donation totals are advanced by external recording processes; this crate
//! only initializes them at zero.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod editor;
pub mod error;
pub mod feeds;
pub mod gateway;
pub mod memory_store;
pub mod model;
pub mod points;
pub mod rest_store;
pub mod session;
pub mod store;

pub use app::Dashboard;
pub use config::Config;
pub use error::{AuthError, Error, StoreError};
pub use gateway::{AuthGateway, Identity, MemoryAuthGateway, RestAuthGateway};
pub use memory_store::MemoryStore;
pub use model::{InternProfile, LeaderboardEntry, Reward};
pub use points::points_for;
pub use rest_store::RestStore;
pub use store::DocumentStore;
