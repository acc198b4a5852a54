use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::output::outputs::Outputs;

#[derive(clap::ValueEnum, Clone)]
pub enum ColorPolicy {
    /// Use colors if the stdout is detected to be a terminal.
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// MIG strategy: none, single, mixed, mixed-memory-qualified or
    /// mixed-fractionally-qualified
    #[arg(
        long,
        env = "MIG_STRATEGY",
        global = true,
        help_heading("GLOBAL OPTIONS")
    )]
    pub mig_strategy: Option<String>,

    /// Path to a TOML snapshot of the node's GPUs
    #[arg(
        long,
        value_hint = clap::ValueHint::FilePath,
        env = "MIG_AGENT_TOPOLOGY",
        global = true,
        help_heading("GLOBAL OPTIONS")
    )]
    pub topology: Option<PathBuf>,

    /// Path to the agent configuration file
    #[arg(
        long,
        value_hint = clap::ValueHint::FilePath,
        env = "MIG_AGENT_CONFIG",
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub config: Option<PathBuf>,

    /// Sets console color policy
    #[arg(
        long,
        default_value_t = ColorPolicy::Auto,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub colors: ColorPolicy,

    /// Sets output formatting
    #[arg(
        long,
        env = "MIG_AGENT_OUTPUT_MODE",
        default_value_t = Outputs::CLI,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub output_mode: Outputs,

    /// Enables more detailed log output
    #[arg(
        long,
        env = "MIG_AGENT_DEBUG",
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub debug: bool,
}

// Root CLI options
#[derive(Parser)]
#[command(
    author,
    about,
    version(crate::MIG_AGENT_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct RootOptions {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    /// Show the device plugins that would be started on the node
    Plugins(PluginsOpts),
    /// Show the distinct MIG resources present on the node
    Resources,
    /// Check whether a MIG device satisfies a resource
    Match(MatchOpts),
    /// Generate shell completion script
    GenerateCompletion(GenerateCompletionOpts),
}

#[derive(Parser)]
pub struct PluginsOpts {
    /// List the devices advertised by each plugin
    #[arg(long)]
    pub devices: bool,
}

#[derive(Parser)]
pub struct MatchOpts {
    /// Index of the GPU
    #[arg(long)]
    pub gpu: u32,

    /// Index of the MIG device within the GPU
    #[arg(long)]
    pub mig: u32,

    /// Resource name without the `nvidia.com/` prefix, e.g. `mig-3g.20gb`
    #[arg(long)]
    pub resource: String,
}

#[derive(Parser)]
pub struct GenerateCompletionOpts {
    /// Shell flavour for which the completion script should be generated
    #[arg(value_enum)]
    pub shell: Shell,
}
