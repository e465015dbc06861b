//! Leaderboard screen

use std::time::Duration;

use anyhow::Result;
use intern_rewards::Dashboard;

use crate::style::*;

pub async fn render(dashboard: &Dashboard, limit: usize) -> Result<()> {
    print_header("Leaderboard");

    let mut rx = dashboard.leaderboard();
    let entries = super::settle(&mut rx, |l| !l.is_empty(), Duration::from_secs(5)).await;

    if entries.is_empty() {
        print_info("No interns on the leaderboard yet.");
        return Ok(());
    }

    let you = dashboard.identity().map(|i| i.user_id);

    println!();
    println!(
        "{:>4}  {:<22}  {:>12}  {:>7}",
        "Rank", "Intern", "Total Raised", "Points"
    );
    println!("{}", "─".repeat(60));

    for (i, entry) in entries.iter().take(limit).enumerate() {
        let position = i + 1;
        let is_you = you.as_deref() == Some(entry.id.as_str());
        let name = if is_you {
            cyan(&format!("{} (You)", entry.name))
        } else {
            entry.name.clone()
        };

        println!(
            "{:>4}  {:<22}  {:>12}  {:>7}  {}",
            medal(position),
            name,
            format_usd(entry.total_donations),
            entry.points(),
            dim(&entry.referral_code)
        );
    }

    println!();
    println!("Total interns: {}", entries.len());
    Ok(())
}
