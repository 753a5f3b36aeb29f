//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Inspect and manage the persisted highlight tweak file.
///
/// The interactive picker lives inside the editor; this binary only works
/// with the stored tweaks.
#[derive(Debug, Parser)]
#[command(name = "retint", version, after_help = retint::build_info::HELP_BUILD_METADATA)]
pub struct Args {
    /// Path to config file (default: ./retint.toml or ~/.config/retint/retint.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// List stored tweaks, for every theme or one theme.
    List {
        /// Restrict the listing to one theme.
        theme: Option<String>,
    },
    /// Remove stored tweaks for a theme (or everything with --all).
    Clear {
        /// Theme whose tweaks should be removed.
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        theme: Option<String>,

        /// Remove the tweaks of every theme.
        #[arg(long)]
        all: bool,
    },
    /// Print the resolved tweak file path.
    Path,
}
