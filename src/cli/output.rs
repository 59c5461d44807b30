//! Terminal output for commands
//!
//! `colored` honours NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

/// Failure line on stderr, red "error:" prefix
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Completed edit or passed check
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Title line for a block of fields
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// `name: value` line, indented under a header
pub fn field(name: &str, value: &(impl Display + ?Sized)) {
    println!("  {}: {}", name.green(), value);
}

/// Uncoloured output that callers may pipe elsewhere (records, trees, TOML)
pub fn plain(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
