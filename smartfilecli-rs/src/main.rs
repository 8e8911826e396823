use clap::Parser;
use smartfile_core::config::log_filter_from_env;
use smartfile_core::format_result;
use smartfile_core::prelude::*;
use std::io;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  smartfilecli \"delete all .png files in Downloads\"
  smartfilecli \"move all .jpegs in Downloads to Pictures\" --dry-run
  smartfilecli \"copy all PDFs from Documents to Backup\" --recursive
  smartfilecli \"create a new folder called Projects in Documents\"";

/// SmartFileCmd - Natural Language File Manager
#[derive(Parser, Debug)]
#[command(name = "smartfilecli", version, about, after_help = EXAMPLES)]
struct Cli {
    /// Natural language command (e.g. "remove all .txt files")
    command: String,

    /// Preview mode - show what would be done
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    force: bool,

    /// Scan subdirectories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn flags(&self) -> RunFlags {
        RunFlags {
            dry_run: self.dry_run,
            force: self.force,
            recursive: self.recursive,
            verbose: self.verbose,
        }
    }
}

fn init_tracing(directives: Option<&str>, verbose: bool) {
    let default = if verbose { "smartfile_core=info" } else { "warn" };
    let filter = directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Raises `cancel` on Ctrl-C. When nothing is polling the flag, such as a
/// blocked confirmation read, the invocation is ended here instead.
fn install_interrupt_handler(cancel: CancelToken, verbose: bool) {
    let installed = ctrlc::set_handler(move || {
        if !cancel.cancel() {
            report(&CoreError::UserCancelled, verbose);
            std::process::exit(1);
        }
    });
    if let Err(err) = installed {
        warn!(%err, "could not install Ctrl-C handler");
    }
}

/// Text to print for a finished invocation and the matching exit status.
fn conclude(outcome: &Outcome, verbose: bool) -> (String, ExitCode) {
    match outcome {
        Outcome::Preview(text) => (format!("🔎 {text}"), ExitCode::SUCCESS),
        Outcome::Completed(result) => {
            let code = if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            };
            (format_result(result, verbose), code)
        }
    }
}

fn run(cli: &Cli, settings: &Settings, cancel: CancelToken) -> Result<ExitCode> {
    if settings.api_key.is_some() {
        debug!("API key configured, but no model client is built in; using rule-based parser");
    }
    let parser = RuleBasedParser::new();

    if cli.verbose {
        println!("🔍 Parsing command: {}", cli.command);
    }
    let cmd = prepare(&parser, &cli.command, cli.flags())?;
    if cli.verbose {
        println!("✅ Parsed command: {cmd:?}");
        if !cmd.dry_run {
            println!("🚀 Executing command...");
        }
    }

    let host = RealHostFs;
    let stdin = io::stdin();
    let outcome = Pipeline::new(&host, settings)
        .with_cancel(cancel)
        .run(cmd, stdin.lock(), io::stdout())?;

    let (text, code) = conclude(&outcome, cli.verbose);
    println!("{text}");
    Ok(code)
}

fn report(err: &CoreError, verbose: bool) {
    match err {
        CoreError::UserCancelled => eprintln!("\n⚠️ {err}"),
        _ => eprintln!("❌ {err}"),
    }
    if verbose {
        if let Some(detail) = err.detail() {
            eprintln!("{detail}");
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(log_filter_from_env().as_deref(), cli.verbose);
    let settings = Settings::from_env();

    let cancel = CancelToken::new();
    install_interrupt_handler(cancel.clone(), cli.verbose);

    match run(&cli, &settings, cancel) {
        Ok(code) => code,
        Err(err) => {
            report(&err, cli.verbose);
            err.exit_code()
        }
    }
}
