//! Clap derive structures for the `fuelwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fuelwatch -- vehicle telemetry monitor for the command line
#[derive(Debug, Parser)]
#[command(
    name = "fuelwatch",
    version,
    about = "Monitor vehicle telemetry and fuel alerts from the command line",
    long_about = "A CLI for watching live vehicle telemetry from a hosted realtime\n\
        database: fuel level, ignition, location, and theft/refueling alerts.\n\
        Supports alert resolution, event log management, and First Information\n\
        Report generation.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Telemetry store profile to use
    #[arg(long, short = 'p', env = "FUELWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Telemetry store root URL (overrides profile)
    #[arg(long, short = 'd', env = "FUELWATCH_DATABASE", global = true)]
    pub database: Option<String>,

    /// Database auth token
    #[arg(long, env = "FUELWATCH_AUTH_TOKEN", global = true, hide_env = true)]
    pub auth_token: Option<String>,

    /// Officer name stamped on generated reports
    #[arg(long, env = "FUELWATCH_OFFICER", global = true)]
    pub officer: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FUELWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FUELWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FUELWATCH_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current telemetry snapshot
    #[command(alias = "st")]
    Status,

    /// Watch telemetry changes until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Start, stop, or toggle the vehicle
    #[command(alias = "veh")]
    Vehicle(VehicleArgs),

    /// Inspect and resolve fuel alerts
    Alert(AlertArgs),

    /// View and manage the event log
    #[command(alias = "log")]
    Logs(LogsArgs),

    /// Generate a First Information Report from the latest alert context
    #[command(alias = "fir")]
    Report(ReportArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds
    #[arg(long, short = 'i', default_value = "10")]
    pub interval: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VEHICLE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VehicleArgs {
    #[command(subcommand)]
    pub command: VehicleCommand,
}

#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Start the vehicle (no-op if already running)
    Start,
    /// Stop the vehicle (no-op if already stopped)
    Stop,
    /// Flip the vehicle's running state
    Toggle,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertArgs {
    #[command(subcommand)]
    pub command: AlertCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertCommand {
    /// Show the current alert state
    Show,
    /// Resolve the active alert, logging the classified incident
    Resolve,
    /// Turn fuel monitoring on
    Monitor,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List the recent theft/refueling log entries
    List {
        /// Restrict to one category
        #[arg(long, short = 'c', default_value = "all")]
        category: LogCategory,
    },
    /// Delete the entire remote log collection
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogCategory {
    All,
    Theft,
    Refuel,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Write the rendered report to a file instead of stdout
    #[arg(long, short = 'f')]
    pub file: Option<std::path::PathBuf>,

    /// Build the report from a stored log entry instead of the live
    /// alert context (e.g. theft/0 for the newest theft entry)
    #[arg(long, short = 'l', value_name = "CATEGORY/INDEX")]
    pub log: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create a profile
    Init,
    /// Show the merged configuration
    Show,
    /// Print the config file path
    Path,
    /// List configured profiles
    Profiles,
    /// Store an auth token in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to the active profile)
        name: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
