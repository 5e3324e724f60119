use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use bootstrap_cdn::{
    APPLY_EXTENSIONS, ApplyConfig, CdnTarget, DEFAULT_ROOT, PREVIEW_SAMPLE_LIMIT, PreviewConfig,
    apply_fs, output, preview_fs,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;

use crate::logging;

/// `bootstrap-cdn` points every Bootstrap CSS/JS reference in a site at one pinned CDN release.
#[derive(Parser, Debug)]
#[command(name = "bootstrap-cdn", author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite every matching file in place, backing up originals first
    Apply(ApplyArgs),
    /// Show what would change on a small sample of files
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Directory to walk
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Backup directory (default: timestamped directory next to the root)
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// File name suffix to process, e.g. `.html` (repeatable; replaces the defaults)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Glob pattern of files to leave alone (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Report what would change without backing up or writing
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Directory to walk
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Number of files to sample
    #[arg(long, default_value_t = PREVIEW_SAMPLE_LIMIT)]
    pub limit: usize,
}

impl ApplyArgs {
    fn to_config(&self) -> ApplyConfig {
        let mut config = ApplyConfig::default();
        config.source.root.clone_from(&self.root);
        config.source.extensions = if self.extensions.is_empty() {
            APPLY_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect()
        } else {
            self.extensions.clone()
        };
        config.source.exclude.clone_from(&self.exclude);
        config.backup_dir.clone_from(&self.backup_dir);
        config.dry_run = self.dry_run;
        config
    }
}

impl PreviewArgs {
    fn to_config(&self) -> PreviewConfig {
        let mut config = PreviewConfig::default();
        config.source.root.clone_from(&self.root);
        config.limit = self.limit;
        config
    }
}

/// Parse arguments, set up logging and run the selected command.
///
/// # Errors
///
/// Returns an error if the root is missing, a preview finds nothing to
/// sample, or writing the report fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let target = CdnTarget::BOOTSTRAP_5_3_3;
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Command::Apply(args) => run_apply(args, &target, &mut stdout),
        Command::Preview(args) => run_preview(args, &target, &mut stdout),
    }
}

fn run_apply(args: &ApplyArgs, target: &CdnTarget, out: &mut dyn Write) -> Result<()> {
    let config = args.to_config();

    if !args.json {
        writeln!(out, "{}", "=== Bootstrap to CDN Update ===".bold())?;
        writeln!(out, "Updating to Bootstrap {}", target.version)?;
        if config.dry_run {
            writeln!(out, "Dry run: files will not be modified")?;
        }
        writeln!(out)?;
        writeln!(out, "Scanning {} for files to update...", config.source.root.display())?;
    }

    let report = apply_fs(&config, target)?;

    if args.json {
        output::write_json(&report, out)?;
    } else {
        output::write_human(&report, out)?;
        writeln!(out)?;
        writeln!(out, "{}", "Update complete!".green())?;
    }
    Ok(())
}

fn run_preview(args: &PreviewArgs, target: &CdnTarget, out: &mut dyn Write) -> Result<()> {
    let config = args.to_config();

    writeln!(out, "{}", "=== Bootstrap Update Preview ===".bold())?;
    writeln!(out, "Previewing update to Bootstrap {} CDN", target.version)?;
    writeln!(out, "Will inspect up to {} files", config.limit)?;
    writeln!(out)?;

    let report = preview_fs(&config, target)?;
    writeln!(out, "Found {} test files", report.files.len())?;
    output::write_preview(&report, out)?;

    writeln!(out, "{}", "Preview complete!".green())?;
    writeln!(out)?;
    writeln!(out, "To apply changes to all files, run:")?;
    writeln!(
        out,
        "  bootstrap-cdn apply --root {}",
        config.source.root.display()
    )?;
    Ok(())
}
