//! Rename command - update the display name in both copies

use anyhow::{Context, Result};
use intern_rewards::Dashboard;

use crate::style::*;

pub async fn run(dashboard: &Dashboard, name: &str) -> Result<()> {
    let pb = spinner("Saving name...");
    let result = dashboard.rename(name).await;
    pb.finish_and_clear();

    let applied = result.context("Rename failed")?;
    match applied {
        Some(new_name) => {
            print_success(&format!("Renamed to {}", bold(&new_name)));
            print_info("Your profile and the public leaderboard were both updated.");
        }
        None => print_warning("Nothing to do: the new name is empty after trimming."),
    }
    Ok(())
}
