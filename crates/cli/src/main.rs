mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use installgen_lib::targets::Target;

use crate::output::OutputFormat;

/// installgen - generate cluster install assets from an install config
#[derive(Parser)]
#[command(name = "installgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Assets directory (default: $INSTALLGEN_DIR or the current directory)
  #[arg(long, global = true)]
  dir: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate a target and write its files to the assets directory
  Create {
    /// What to generate
    #[arg(value_enum)]
    target: TargetArg,

    /// Install config to read (default: <dir>/install-config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate independent assets in parallel with this many workers
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
  },

  /// Print the asset dependency graph in DOT format
  Graph {
    /// Install config to read (default: <dir>/install-config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
  InstallConfig,
  Manifests,
}

impl From<TargetArg> for Target {
  fn from(arg: TargetArg) -> Self {
    match arg {
      TargetArg::InstallConfig => Target::InstallConfig,
      TargetArg::Manifests => Target::Manifests,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let dir = cli.dir.unwrap_or_else(installgen_lib::platform::paths::assets_dir);

  match cli.command {
    Commands::Create { target, config, jobs } => cmd::cmd_create(target.into(), &dir, config, jobs, cli.output),
    Commands::Graph { config } => cmd::cmd_graph(&dir, config, cli.output),
  }
}
