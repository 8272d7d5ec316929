use std::time::Duration;

use colored::*;

pub mod chaos;
pub mod check;
pub mod concurrent;
pub mod no_join;
pub mod run;
pub mod sequential;

/// Print a status line from the main thread
pub fn status(message: &str) {
    println!("{} {}", "Main:".bold(), message);
}

pub fn print_elapsed(elapsed: Duration) {
    println!("{} {}", "Time:".bold(), format_elapsed(elapsed).cyan());
}

/// Seconds rounded to two decimals
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}
