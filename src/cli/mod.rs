//! CLI interface using clap
//!
//! Provides the command-line interface for rcaloop

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// rcaloop - Closed-loop RCA governance tool
#[derive(Parser, Debug)]
#[command(name = "rcaloop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the workspace (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a governance workspace
    Init(InitArgs),

    /// Ingest an incident report (password-gated)
    Ingest(IngestArgs),

    /// List stored RCA records (audit view)
    List(ListArgs),

    /// Show one RCA with its actions and evidence
    Show(ShowArgs),

    /// List remedial actions (tracker view)
    Actions(ActionsArgs),

    /// Update a remedial action
    Update(UpdateArgs),

    /// Mark an action as independently verified
    Verify(VerifyArgs),

    /// Attach or list evidence for an action
    Evidence(EvidenceArgs),

    /// Find similar historical incidents (recurrence detection)
    Similar(SimilarArgs),

    /// Show dashboard statistics
    Status(StatusArgs),

    /// Insert synthetic demo records
    Seed(SeedArgs),

    /// Watch an inbox directory and auto-ingest new reports
    Watch(WatchArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Launch the interactive TUI dashboard
    Tui(TuiArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force re-initialization
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for ingest command
#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Report file (.docx) or a directory to sweep
    pub target: String,

    /// OEM / customer the report belongs to
    #[arg(long)]
    pub oem: String,

    /// Environment the incident occurred in
    #[arg(short, long)]
    pub environment: String,

    /// Upload password (checked against the configured shared secret)
    #[arg(long, env = "RCALOOP_UPLOAD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Extract and print without persisting
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Filter by OEM
    #[arg(long)]
    pub oem: Option<String>,

    /// Filter by environment
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Filter by status (open, closed)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Maximum rows shown
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// RCA ID to display
    pub rca_id: String,
}

/// Arguments for actions command
#[derive(Parser, Debug)]
pub struct ActionsArgs {
    /// Only actions belonging to this RCA
    #[arg(long)]
    pub rca: Option<String>,

    /// Filter by status (todo, in-progress, done)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Only actions past their due date and not done
    #[arg(long)]
    pub overdue: bool,
}

/// Arguments for update command
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Action ID to update
    pub action_id: String,

    /// New status (todo, in-progress, done)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Owning team
    #[arg(long)]
    pub owner_team: Option<String>,

    /// Owning person
    #[arg(long)]
    pub owner_person: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

/// Arguments for verify command
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Action ID to verify
    pub action_id: String,

    /// Who performed the verification
    #[arg(long)]
    pub by: String,
}

/// Arguments for evidence command
#[derive(Parser, Debug)]
pub struct EvidenceArgs {
    /// Action ID the evidence belongs to
    pub action_id: String,

    /// Attach a new evidence row with this description
    #[arg(short, long)]
    pub add: Option<String>,

    /// Evidence link
    #[arg(long)]
    pub url: Option<String>,

    /// Who supplied the evidence
    #[arg(long)]
    pub by: Option<String>,
}

/// Arguments for similar command
#[derive(Parser, Debug)]
pub struct SimilarArgs {
    /// Incident description to match against stored records
    pub text: String,

    /// Number of matches to return (defaults to the configured top-k)
    #[arg(short, long)]
    pub top: Option<usize>,
}

/// Arguments for status command
#[derive(Parser, Debug)]
pub struct StatusArgs {}

/// Arguments for seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {}

/// Arguments for watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Inbox directory to watch for new .docx reports
    pub inbox: String,

    /// OEM recorded on auto-ingested reports
    #[arg(long)]
    pub oem: String,

    /// Environment recorded on auto-ingested reports
    #[arg(short, long)]
    pub environment: String,

    /// Upload password (checked against the configured shared secret)
    #[arg(long, env = "RCALOOP_UPLOAD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Debounce interval in milliseconds
    #[arg(short, long, default_value = "1000")]
    pub debounce: u64,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Get a configuration value
    #[arg(long)]
    pub get: Option<String>,

    /// Reset to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Arguments for TUI command
#[derive(Parser, Debug)]
pub struct TuiArgs {}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "rcaloop",
            "ingest",
            "report.docx",
            "--oem",
            "Acme",
            "--environment",
            "UAT",
        ]);
        assert!(matches!(cli.command, Commands::Ingest(_)));

        if let Commands::Ingest(args) = cli.command {
            assert_eq!(args.target, "report.docx");
            assert_eq!(args.oem, "Acme");
            assert!(!args.dry_run);
        }
    }

    #[test]
    fn test_list_filters() {
        let cli = Cli::parse_from(["rcaloop", "list", "--oem", "Acme", "--status", "open"]);
        if let Commands::List(args) = cli.command {
            assert_eq!(args.oem.as_deref(), Some("Acme"));
            assert_eq!(args.status.as_deref(), Some("open"));
        } else {
            panic!("expected list command");
        }
    }

    #[test]
    fn test_similar_command() {
        let cli = Cli::parse_from(["rcaloop", "similar", "data outage", "--top", "3"]);
        if let Commands::Similar(args) = cli.command {
            assert_eq!(args.text, "data outage");
            assert_eq!(args.top, Some(3));
        } else {
            panic!("expected similar command");
        }
    }
}
