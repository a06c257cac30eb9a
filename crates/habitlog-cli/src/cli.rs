use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use habitlog_core::VERSION;

/// habitlog - daily improvement, gratitude and habit tracker
#[derive(Parser)]
#[command(name = "habitlog")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(long, global = true, env = "HABITLOG_PATH")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// IANA timezone used to decide "today" (e.g. Asia/Taipei)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Editor for the improvement note
    #[arg(long)]
    pub editor: Option<String>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Day to record (YYYY-MM-DD, "today" or "yesterday"; default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// What to improve (overrides stdin/editor)
    #[arg(long)]
    pub improve: Option<String>,

    /// Gratitude items, comma or newline separated (repeatable)
    #[arg(short, long, value_name = "TEXT")]
    pub gratitude: Vec<String>,

    /// Completed habit id (repeatable)
    #[arg(long, value_name = "ID")]
    pub habit: Vec<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Day to show (default: today)
    #[arg(value_name = "DATE")]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Time window in days or weeks (e.g. "30d", "4w")
    #[arg(long)]
    pub last: Option<String>,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Only days on which this habit id was completed
    #[arg(long, value_name = "ID")]
    pub habit: Option<String>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Day to delete (YYYY-MM-DD)
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum HabitsSubcommand {
    /// List habits
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a habit
    Add {
        /// Habit label
        #[arg(value_name = "LABEL")]
        label: String,
    },

    /// Rename a habit (past entries keep referring to it)
    Rename {
        /// Habit id
        #[arg(value_name = "ID")]
        id: String,

        /// New label
        #[arg(value_name = "LABEL")]
        label: String,
    },

    /// Remove a habit (past entries are left untouched)
    Remove {
        /// Habit id
        #[arg(value_name = "ID")]
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the savings ratio (0, 25 or 50 percent)
    Savings {
        /// Ratio as percent ("25", "25%") or fraction ("0.25")
        #[arg(value_name = "RATIO")]
        ratio: String,
    },
}

/// Arguments for the `stats` command
#[derive(Args)]
pub struct StatsArgs {
    /// Compute as of this local time (YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Output format (json, jsonl)
    #[arg(long, default_value = "json")]
    pub format: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// JSON or JSONL file of entries ("-" reads stdin)
    #[arg(value_name = "FILE")]
    pub file: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new store and write the config file
    Init(InitArgs),

    /// Record the entry for a day (replaces an existing one)
    Add(AddArgs),

    /// Show the entry for a day
    Show(ShowArgs),

    /// List entries, newest first
    List(ListArgs),

    /// Delete the entry for a day
    Delete(DeleteArgs),

    /// Manage habits
    #[command(subcommand)]
    Habits(HabitsSubcommand),

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsSubcommand),

    /// Streak, reward and projection statistics
    Stats(StatsArgs),

    /// Export entries (portable formats)
    Export(ExportArgs),

    /// Import entries from an export or a legacy document dump
    Import(ImportArgs),

    /// Check store integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_repeated_flags() {
        let cli = Cli::try_parse_from([
            "habitlog",
            "add",
            "--improve",
            "sleep before midnight",
            "-g",
            "tea",
            "-g",
            "sunshine",
            "--habit",
            "a1b2c3d4",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.gratitude, vec!["tea", "sunshine"]);
                assert_eq!(args.habit, vec!["a1b2c3d4"]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_habits_subcommand() {
        let cli = Cli::try_parse_from(["habitlog", "habits", "rename", "abc", "Read"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Habits(HabitsSubcommand::Rename { .. }))
        ));
    }
}
