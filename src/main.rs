use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use vmxaudit::vmx;

#[derive(Parser)]
#[command(
    name = "vmxaudit",
    about = "Audit VMware .vmx files against VM image policy",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a .vmx file, or a directory to search for .vmx files
    path: Option<String>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Write output to file instead of stdout
    #[arg(long)]
    output: Option<String>,

    /// YAML profile selecting which rules to skip
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the rules that would run, in report order
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    debug!(path = ?cli.path, profile = ?cli.profile, "starting");

    match cli.command {
        Some(Commands::Rules) => vmx::list_rules(cli.profile.as_deref())?,
        None => {
            let Some(path) = cli.path else {
                anyhow::bail!("A path to a .vmx file is required (see --help)");
            };
            let has_failures = vmx::check_vmx(
                &path,
                cli.profile.as_deref(),
                &cli.format,
                cli.output.as_deref(),
            )?;
            if has_failures {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

/// Diagnostics go to stderr so they never mix with the report on stdout.
/// Default level is `warn` unless `RUST_LOG` says otherwise.
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
