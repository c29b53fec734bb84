use anyhow::Result;
use clap::Parser;
use dltidy::cli::{OrganizeCommand, run_cli};
use dltidy::logging::{LogLevel, init_tracing};
use std::path::PathBuf;

/// Sort the files of a downloads folder into Organized/<Category>/ subfolders.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory to organize (defaults to your downloads folder).
    #[arg(value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    directory: Option<PathBuf>,

    /// Show what would be moved without touching any file.
    #[arg(long)]
    dry_run: bool,

    /// Filter configuration file (TOML).
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Diagnostic log level; RUST_LOG takes precedence.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Emit diagnostic logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level, args.json_logs)?;

    let command = if args.dry_run {
        OrganizeCommand::DryRun
    } else {
        OrganizeCommand::Organize
    };

    run_cli(command, args.directory.as_deref(), args.config.as_deref())?;
    Ok(())
}
