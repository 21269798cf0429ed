/*!
 * Command-line interface for scopy
 */

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use scopy::clipboard::copy_to_clipboard;
use scopy::config::{Args, Config};
use scopy::{Processor, Reporter, Result};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        generate(shell, &mut Args::command(), "scopy", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    // Redirected stdout gets the content directly; a terminal gets the clipboard
    let streaming = args.stdout || !io::stdout().is_terminal();

    let config = Config::from_args(args, !streaming)?;
    config.validate()?;

    let progress = if !streaming && io::stderr().is_terminal() {
        spinner()
    } else {
        ProgressBar::hidden()
    };

    let mut processor = Processor::new(config.clone()).with_progress(Arc::new(progress.clone()));
    let result = processor.process(&config.root);
    progress.finish_and_clear();
    let stats = result?;

    if !streaming {
        match copy_to_clipboard(processor.output()) {
            Ok(()) => eprintln!("Content copied to clipboard!"),
            Err(e) => eprintln!("Warning: could not copy to clipboard: {}", e),
        }
    }

    Reporter::new(args.summary, config.strip_comments).print_report(&stats)
}

fn spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {pos}/{len} {wide_msg:.dim}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
