//! Terminal styling and formatting helpers

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}

pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}

pub fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

pub fn print_success(msg: &str) {
    println!("{} {}", green("✓"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", red("✗"), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", yellow("⚠"), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", cyan("ℹ"), msg);
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", bold(title));
    println!("{}", "─".repeat(title.chars().count()));
}

/// Steady-tick spinner for in-flight gateway calls.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // The template is a constant string that is validated at compile time.
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Rank icon: medals on the podium, plain "#N" below it.
pub fn medal(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{n}"),
    }
}

/// Whole-dollar display with thousands separators, e.g. `$1,234`.
pub fn format_usd(amount: f64) -> String {
    let whole = amount.max(0.0).floor() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(950.0), "$950");
        assert_eq!(format_usd(1234.0), "$1,234");
        assert_eq!(format_usd(1234567.89), "$1,234,567");
        assert_eq!(format_usd(-5.0), "$0");
    }

    #[test]
    fn test_medal() {
        assert_eq!(medal(1), "🥇");
        assert_eq!(medal(3), "🥉");
        assert_eq!(medal(4), "#4");
    }
}
