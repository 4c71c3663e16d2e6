//! Terminal color utilities using ANSI escape codes.
//!
//! Color is applied only when stdout is a terminal and `NO_COLOR` is unset.

use std::io::IsTerminal;

use once_cell::sync::Lazy;

/// ANSI color codes
pub mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

use codes::*;

static ENABLED: Lazy<bool> =
    Lazy::new(|| std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal());

fn paint(style: &str, text: &str) -> String {
    paint_if(*ENABLED, style, text)
}

fn paint_if(enabled: bool, style: &str, text: &str) -> String {
    if enabled {
        format!("{}{}{}", style, text, RESET)
    } else {
        text.to_string()
    }
}

/// Color success messages (green).
pub fn success(text: &str) -> String {
    paint(GREEN, text)
}

/// Color error messages (red).
pub fn error(text: &str) -> String {
    paint(RED, text)
}

/// Color warning messages (yellow).
pub fn warning(text: &str) -> String {
    paint(YELLOW, text)
}

/// Color info messages (cyan).
pub fn info(text: &str) -> String {
    paint(CYAN, text)
}

/// Color a label (bold).
pub fn label(text: &str) -> String {
    paint(BOLD, text)
}

/// Dim secondary text such as timestamps and placeholders.
pub fn dim(text: &str) -> String {
    paint(DIM, text)
}

/// Color a number/count (bright cyan).
pub fn number(n: impl std::fmt::Display) -> String {
    paint(BRIGHT_CYAN, &n.to_string())
}
