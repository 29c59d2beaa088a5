//! The `list` subcommand: column-aligned overview of managed dotfiles.

use std::fmt::Write as _;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::paths;
use crate::sync::compare;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if configuration loading or a content comparison fails.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let config = super::load_config(global)?;
    print!("{}", render(&config)?);
    Ok(())
}

/// Render the listing: one section per category, one line per entry showing
/// tracked state (`[s ]` stored, `[s<]` stored but modified, `[  ]`
/// untracked) and the resolved paths on both sides.
///
/// # Errors
///
/// Returns an error if a content comparison fails.
pub fn render(config: &Config) -> Result<String> {
    let flat = config.flat_dotfiles();
    let name_width = flat.keys().map(|name| name.chars().count()).max().unwrap_or(0);
    let store_disp = paths::collapse_home(&config.store_dir);

    let mut out = String::new();
    writeln!(
        out,
        "Managed dotfiles ({}/{}):",
        flat.len(),
        config.categories.len()
    )?;
    writeln!(out, "{}", "-".repeat((name_width + 60).min(terminal_columns())))?;

    for category in &config.categories {
        writeln!(out, "{}:", category.name)?;
        let cat_dir = category.store_dir(&config.store_dir);
        for entry in &category.entries {
            let store_path = cat_dir.join(&entry.name);
            let stored = store_path.exists();
            let modified = stored
                && entry.target.exists()
                && compare::paths_differ(&store_path, &entry.target)?;
            let marker = if stored {
                if modified { "[s<]" } else { "[s ]" }
            } else {
                "[  ]"
            };
            let display_name = if entry.is_dir || store_path.is_dir() {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            writeln!(
                out,
                "  {:<name_width$} {marker} {store_disp}/{}/{display_name} -> {}",
                entry.name,
                category.name,
                paths::collapse_home(&entry.target)
            )?;
        }
    }

    Ok(out)
}

/// Terminal width in columns, falling back to 80 when not attached to a
/// terminal.
fn terminal_columns() -> usize {
    terminal_size::terminal_size().map_or(80, |(width, _)| usize::from(width.0))
}
