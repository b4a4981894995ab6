//! Terminal output

pub mod console;
pub mod formatter;

pub use console::ConsoleMessenger;
pub use formatter::NoticeFormatter;

/// Turn ANSI colors off for the whole process (`--no-color`, `[output] color = false`).
pub fn disable_color() {
    colored::control::set_override(false);
}
