//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::views::Page;

/// Run command arguments.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Operator username
    #[arg(short, long)]
    pub username: String,

    /// Operator password
    #[arg(short, long)]
    pub password: String,

    /// Pages to open, in order
    #[arg(long = "page", value_enum, default_values_t = vec![PageArg::Dashboard])]
    pub pages: Vec<PageArg>,

    /// Seconds to keep each page open
    #[arg(short, long, default_value = "10")]
    pub duration_secs: u64,

    /// Never contact the backend
    #[arg(long)]
    pub offline: bool,

    /// Activate the emergency protocol after logging in
    #[arg(long)]
    pub emergency: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Never contact the backend
    #[arg(long)]
    pub offline: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Console page argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageArg {
    /// KPIs, fleet chart and feeds
    Dashboard,
    /// Drone cards
    Fleet,
    /// Trend, battery, performance and mission charts
    Analytics,
    /// Supply cards
    Inventory,
    /// Grounded drones
    Maintenance,
    /// Flights in progress
    Tracking,
}

impl From<PageArg> for Page {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::Dashboard => Self::Dashboard,
            PageArg::Fleet => Self::Fleet,
            PageArg::Analytics => Self::Analytics,
            PageArg::Inventory => Self::Inventory,
            PageArg::Maintenance => Self::Maintenance,
            PageArg::Tracking => Self::Tracking,
        }
    }
}
