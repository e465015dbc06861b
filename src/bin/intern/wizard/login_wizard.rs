//! Login Wizard - Interactive sign-in, then the dashboard menu
//!
//! Mirrors the app's three screens: the login surface (with inline auth
//! errors), the dashboard, and the leaderboard. A pre-provisioned session
//! token, when present, is tried once before the first prompt.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use intern_rewards::{Config, Dashboard, Error};

use crate::commands;
use crate::style::{print_error, print_success, print_warning, spinner};

pub async fn run_login_wizard(dashboard: &Dashboard, config: &Config) -> Result<()> {
    println!("{}", style("  Intern Rewards").cyan().bold());
    println!("  {}", style("Track your impact and unlock rewards").dim());
    println!();

    // Silent one-shot restoration; failure just falls through to the login
    // surface.
    if let Some(token) = config.session_token() {
        let pb = spinner("Restoring session...");
        let restored = dashboard.restore(&token).await;
        pb.finish_and_clear();
        if restored {
            print_success("Session restored");
        }
    }

    if dashboard.identity().is_none() {
        sign_in_loop(dashboard).await?;
    }

    menu_loop(dashboard).await
}

/// The login surface. Auth errors are shown inline and the user stays here;
/// only a successful gateway call moves on.
async fn sign_in_loop(dashboard: &Dashboard) -> Result<()> {
    loop {
        let action = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("  Account")
            .items(&["Sign in", "Sign up"])
            .default(0)
            .interact()?;

        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("  Email")
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() || !input.contains('@') {
                    return Err("Please enter a valid email address");
                }
                Ok(())
            })
            .interact_text()?;

        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("  Password")
            .interact()?;

        if password.is_empty() {
            print_warning("Please enter both email and password.");
            continue;
        }

        let pb = spinner(if action == 1 {
            "Creating your account..."
        } else {
            "Signing in..."
        });
        let result = if action == 1 {
            dashboard.sign_up(&email, &password).await
        } else {
            dashboard.sign_in(&email, &password).await
        };
        pb.finish_and_clear();

        match result {
            Ok(()) => {
                print_success(if action == 1 {
                    "Account created. Welcome aboard!"
                } else {
                    "Signed in."
                });
                return Ok(());
            }
            // The session is live but the first-session profile setup
            // failed; carry on in a degraded state rather than locking the
            // user out.
            Err(Error::Store(e)) => {
                print_warning(&format!("Signed in, but profile setup failed: {e}"));
                return Ok(());
            }
            Err(e) => print_error(&e.to_string()),
        }
    }
}

async fn menu_loop(dashboard: &Dashboard) -> Result<()> {
    loop {
        println!();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("  Where to?")
            .items(&["Dashboard", "Leaderboard", "Edit name", "Logout"])
            .default(0)
            .interact()?;

        match choice {
            0 => commands::dashboard::render(dashboard).await?,
            1 => commands::leaderboard::render(dashboard, 20).await?,
            2 => edit_name(dashboard).await?,
            _ => {
                dashboard.sign_out().await;
                println!();
                print_success("Logged out. All local data cleared.");
                return Ok(());
            }
        }
    }
}

/// The editing surface closes only after both writes resolve; a failure is
/// reported instead of silently swallowed.
async fn edit_name(dashboard: &Dashboard) -> Result<()> {
    let current = dashboard
        .profile()
        .borrow()
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_default();

    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("  Name")
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    let pb = spinner("Saving...");
    let result = dashboard.rename(&name).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(applied)) => print_success(&format!("Name updated to {applied}")),
        Ok(None) => print_warning("Name unchanged (empty input)."),
        Err(e) => print_error(&format!("Rename failed: {e}")),
    }
    Ok(())
}
