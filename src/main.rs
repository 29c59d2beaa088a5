use anyhow::Result;
use clap::Parser;

use dotman::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    install_interrupt_handler();

    let args = cli::Cli::parse();
    logging::init(args.verbose);

    match args.command {
        cli::Command::Deploy(opts) => commands::deploy::run(&args.global, &opts),
        cli::Command::Retrieve(opts) => commands::retrieve::run(&args.global, &opts),
        cli::Command::Diff(opts) => commands::diff::run(&args.global, &opts),
        cli::Command::List => commands::list::run(&args.global),
        cli::Command::Clean(opts) => commands::clean::run(&args.global, &opts, args.verbose),
        cli::Command::Git(opts) => commands::git::run(&args.global, &opts),
        cli::Command::Completions(opts) => commands::completions::run(opts.shell),
    }
}

/// Restore the terminal cursor if the process is interrupted mid-prompt.
///
/// `dialoguer` hides the cursor while a prompt is active; a plain SIGINT
/// would otherwise leave the terminal without one.
fn install_interrupt_handler() {
    let _ = ctrlc::set_handler(|| {
        let _ = dialoguer::console::Term::stderr().show_cursor();
        std::process::exit(130);
    });
}
