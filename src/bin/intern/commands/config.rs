//! Config command - show resolved configuration

use anyhow::Result;
use intern_rewards::Config;

use crate::style::*;

pub fn run(config: &Config, local: bool) -> Result<()> {
    print_header("Configuration");
    println!();
    println!("Tenant:         {}", cyan(&config.tenant_id()));

    if local {
        println!(
            "Backend:        {}",
            yellow("local (in-process store with demo catalog)")
        );
    } else {
        println!("Store:          {}", config.store_url());
        println!("Auth gateway:   {}", config.auth_url());
        println!(
            "Store refresh:  every {}s",
            config.store_refresh().as_secs()
        );
    }

    println!(
        "Session token:  {}",
        if config.session_token().is_some() {
            green("provisioned")
        } else {
            dim("not set")
        }
    );
    Ok(())
}
