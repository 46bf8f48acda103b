//! Clap derive structures for the `virtus` CLI.
//!
//! Defines the complete command tree, global flags, and shared argument
//! enums. This module is also pulled in by `build.rs` for man-page
//! generation, so it depends on nothing but clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// virtus -- control Equation Virtus air conditioners from the command line
#[derive(Debug, Parser)]
#[command(
    name = "virtus",
    version,
    about = "Control Equation Virtus air conditioners from the command line",
    long_about = "Talks to the Enki cloud that backs Equation Virtus split units.\n\n\
        Reads poll the device's last reported state; writes are optimistic\n\
        and reconciled by the refresh that follows each command.",
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
    /// Enki account username (overrides config)
    #[arg(long, short = 'u', env = "VIRTUS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Enki account password
    #[arg(long, env = "VIRTUS_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Home identifier
    #[arg(long, env = "VIRTUS_HOME_ID", global = true)]
    pub home_id: Option<String>,

    /// Node identifier of the air conditioner
    #[arg(long, env = "VIRTUS_NODE_ID", global = true)]
    pub node_id: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VIRTUS_OUTPUT",
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Yaml,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Command tree ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current device state
    Status,

    /// Poll continuously and print state changes as they arrive
    Watch(WatchArgs),

    /// Show device metadata (model, factory id, home)
    Info,

    /// Show the raw device error report
    Errors,

    /// List the air-conditioner nodes in the configured home
    Discover,

    /// Change the climate mode (off powers the unit down)
    Mode(ModeArgs),

    /// Set the target temperature in °C
    Temp(TempArgs),

    /// Set the fan speed
    Fan(FanArgs),

    /// Control louver swing
    Swing(SwingArgs),

    /// Toggle a device mode flag
    Flag(FlagArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls
    #[arg(long, default_value_t = 30)]
    pub interval: u64,
}

#[derive(Debug, Args)]
pub struct ModeArgs {
    pub mode: ModeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Off,
    Cool,
    Heat,
    Dry,
    Fan,
    Auto,
}

#[derive(Debug, Args)]
pub struct TempArgs {
    /// Target temperature, 16-30 °C in whole degrees
    pub degrees: f64,
}

#[derive(Debug, Args)]
pub struct FanArgs {
    pub speed: FanArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FanArg {
    Low,
    Medium,
    High,
    Auto,
}

#[derive(Debug, Args)]
pub struct SwingArgs {
    #[command(subcommand)]
    pub command: SwingCommand,
}

#[derive(Debug, Subcommand)]
pub enum SwingCommand {
    /// Set the combined swing mode across both axes
    Mode { mode: SwingModeArg },

    /// Park one axis on a discrete position (or auto to sweep)
    Set {
        axis: AxisArg,
        position: PositionArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwingModeArg {
    Off,
    Vertical,
    Horizontal,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisArg {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    Auto,
    #[value(name = "1")]
    Level1,
    #[value(name = "2")]
    Level2,
    #[value(name = "3")]
    Level3,
    #[value(name = "4")]
    Level4,
    #[value(name = "5")]
    Level5,
}

#[derive(Debug, Args)]
pub struct FlagArgs {
    pub flag: FlagArg,
    pub state: OnOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlagArg {
    Quiet,
    Sleep,
    Health,
    FrostProtection,
    SelfClean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnOff {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup: log in, pick a device, write the config file
    Init,

    /// Print the loaded configuration with secrets masked
    Show,

    /// Print the config file path
    Path,

    /// Store the account password in the OS keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
