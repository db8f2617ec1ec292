//! CLI argument parsing for profilestore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Inspect the diet planner's per-user store", long_about = None)]
pub struct Cli {
    /// Path to config file (the same file `dp` reads)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the store directory
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List users with stored records
    Users,

    /// List record keys for a user
    Keys {
        /// User identifier
        #[arg(required = true)]
        user: String,
    },

    /// Print a record
    Get {
        /// User identifier
        #[arg(required = true)]
        user: String,

        /// Record key (e.g. profile, saved_recipes)
        #[arg(required = true)]
        key: String,
    },

    /// Delete a record
    Delete {
        /// User identifier
        #[arg(required = true)]
        user: String,

        /// Record key
        #[arg(required = true)]
        key: String,
    },
}
