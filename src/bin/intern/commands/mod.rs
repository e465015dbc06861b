//! CLI command implementations

pub mod config;
pub mod dashboard;
pub mod leaderboard;
pub mod rename;

use std::time::Duration;

use tokio::sync::watch;

/// Waits until the feed state satisfies `ready` or the timeout lapses, then
/// returns the current value either way (last known data is still worth
/// rendering).
pub async fn settle<T: Clone>(
    rx: &mut watch::Receiver<T>,
    ready: impl Fn(&T) -> bool,
    timeout: Duration,
) -> T {
    let _ = tokio::time::timeout(timeout, async {
        while !ready(&rx.borrow()) {
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    let value = rx.borrow().clone();
    value
}
