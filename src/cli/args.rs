//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    acft::AcftCommands,
    completions::CompletionsArgs,
    config::ConfigCommands,
    part::PartCommands,
    report::ReportCommands,
    session::LoginArgs,
    stage::StageCommands,
    status::StatusArgs,
    test::TestCommands,
    user::UserCommands,
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "aerocode")]
#[command(author, version, about = "Aircraft production tracking")]
#[command(long_about = "Track aircraft, production stages, parts, quality tests, employees and reports.\n\nEach invocation starts from the seeded fixture data; use `aerocode shell` to keep changes across commands.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (log every mutation)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log in as this user before running the command
    #[arg(long, short = 'u', global = true, env = "AEROCODE_USER")]
    pub user: Option<String>,

    /// Password for --user (prompted when omitted on a terminal)
    #[arg(long, global = true, env = "AEROCODE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl GlobalOpts {
    /// Replace `auto` with the configured default format, if any
    pub fn apply_config(&mut self, config: &Config) {
        if self.format != OutputFormat::Auto {
            return;
        }
        if let Some(format) = config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
        {
            self.format = format;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check credentials and start a session
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the logged-in user and what they may do
    Whoami,

    /// Aircraft management
    #[command(subcommand)]
    Acft(AcftCommands),

    /// Production stage management
    #[command(subcommand)]
    Stage(StageCommands),

    /// Part inventory management
    #[command(subcommand)]
    Part(PartCommands),

    /// Quality test management
    #[command(subcommand)]
    Test(TestCommands),

    /// Employee administration
    #[command(subcommand)]
    User(UserCommands),

    /// Report generation and tracking
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show the production dashboard
    Status(StatusArgs),

    /// Interactive session keeping changes between commands
    Shell,

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (detail view for show, table for list)
    #[default]
    Auto,
    /// Aligned columns (for terminals and piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just keys, one per line
    Id,
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
    fn test_configured_format_replaces_auto() {
        let mut global = GlobalOpts {
            format: OutputFormat::Auto,
            quiet: false,
            verbose: false,
            user: None,
            password: None,
        };
        let config = Config {
            default_format: Some("json".into()),
            ..Default::default()
        };
        global.apply_config(&config);
        assert_eq!(global.format, OutputFormat::Json);

        global.format = OutputFormat::Csv;
        global.apply_config(&config);
        assert_eq!(global.format, OutputFormat::Csv);
    }
}
