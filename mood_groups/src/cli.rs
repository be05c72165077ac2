use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

/// Command line interface for the MindSpace mood-group directory.
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the data directory holding the store file.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Override the chat retention window in days.
    #[arg(long)]
    pub retention_days: Option<u16>,
    /// Enable or disable logging (true/false).
    #[arg(long)]
    pub logging: Option<bool>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or reuse a user and make them the active session user.
    Login {
        name: String,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// List mood groups with their member counts and last activity.
    Moods,
    /// Assign the active user to the group matching a mood.
    Join { mood: String },
    /// Send a text message to the active user's current group.
    Send { text: String },
    /// Record a voice message reference in the current group.
    SendVoice {
        audio: String,
        duration_secs: u32,
    },
    /// Print a group transcript (defaults to the current group).
    Log {
        #[arg(long)]
        mood: Option<String>,
    },
    /// Show mood movements, optionally filtered.
    Movements {
        /// Match either endpoint of the transition.
        #[arg(long)]
        mood: Option<String>,
        /// RFC 3339 lower bound, e.g. 2026-08-01T00:00:00Z.
        #[arg(long)]
        since: Option<String>,
        /// Print aggregate counts instead of the raw log.
        #[arg(long)]
        stats: bool,
    },
    /// Soft-flag a message for moderators.
    Report { message_id: Uuid, reason: String },
    /// List reported messages.
    Reports,
    /// Clear messages from the current group.
    Clear {
        #[arg(value_enum, default_value = "all")]
        scope: ScopeArg,
    },
    /// Drop messages older than the retention window from all groups.
    Clean,
    /// Operations on mood categories.
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeArg {
    All,
    Own,
    Expired,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List the current category set.
    List,
    /// Add a category; the key is derived from the label.
    Add {
        label: String,
        #[arg(long, default_value = "🙂")]
        emoji: String,
        #[arg(long, default_value = "#9aa5b1")]
        color: String,
        /// Display name of the chat group; defaults to "<label> Circle".
        #[arg(long)]
        group_name: Option<String>,
        #[arg(long, default_value = "circle")]
        icon: String,
    },
    /// Update presentation fields of an existing category.
    Update {
        key: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        group_name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Remove an empty category.
    Remove { key: String },
}
