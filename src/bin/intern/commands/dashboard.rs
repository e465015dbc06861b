//! Dashboard screen - own stats and the rewards catalog

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use intern_rewards::Dashboard;

use crate::style::*;

pub async fn render(dashboard: &Dashboard) -> Result<()> {
    let mut profile_rx = dashboard.profile();
    let profile = super::settle(&mut profile_rx, |p| p.is_some(), Duration::from_secs(5)).await;

    // Absent profile is "still loading", never an error.
    let Some(profile) = profile else {
        print_info("Loading your dashboard... your profile has not synced yet.");
        return Ok(());
    };

    print_header("Dashboard");
    println!();
    println!("  Welcome back, {}! 👋", bold(&profile.name));
    println!();
    println!(
        "  Total Donations   {:>10}   {}",
        green(&format_usd(profile.total_donations)),
        dim(&format!("from {} donations", profile.donations_count))
    );
    println!(
        "  Reward Points     {:>10}   {}",
        bold(&profile.points().to_string()),
        dim("1 point = $10 raised")
    );
    println!(
        "  Referral Code     {:>10}   {}",
        cyan(&profile.referral_code),
        dim("share with friends to earn more")
    );

    let mut rewards_rx = dashboard.rewards();
    let rewards = super::settle(&mut rewards_rx, |r| !r.is_empty(), Duration::from_secs(3)).await;

    println!();
    println!("{}", bold("Available Rewards"));
    if rewards.is_empty() {
        print_info("No rewards in the catalog yet.");
        return Ok(());
    }

    let points = profile.points();
    for reward in &rewards {
        let badge = if reward.unlocked_by(points) {
            "Unlocked".green().bold().to_string()
        } else {
            "Locked".dimmed().to_string()
        };
        println!(
            "  {}  {:<24} {:>6} pts   {}",
            reward.icon, reward.title, reward.points, badge
        );
        if !reward.description.is_empty() {
            println!("      {}", dim(&reward.description));
        }
    }

    Ok(())
}
