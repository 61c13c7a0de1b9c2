//! Themes subcommand handler

use termsvg::theme::{builtin_names, DEFAULT_THEME};

/// List built-in themes, marking the fallback.
pub fn handle_themes() {
    for name in builtin_names() {
        if name == DEFAULT_THEME {
            println!("{name} (default)");
        } else {
            println!("{name}");
        }
    }
}
