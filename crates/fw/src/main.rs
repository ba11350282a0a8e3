//! `fw` -- build, check and fill form schemas.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C exits cleanly, a second one forces exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("fw=debug,formwork_storage=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let result =
        RuntimeContext::from_global_args(&cli.global).and_then(|ctx| dispatch(&ctx, cli.command));

    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn dispatch(ctx: &RuntimeContext, command: Option<Commands>) -> anyhow::Result<()> {
    match command {
        Some(Commands::Init(args)) => commands::init::run(ctx, &args),
        Some(Commands::Create(args)) => commands::create::run(ctx, &args),
        Some(Commands::List) => commands::list::run(ctx),
        Some(Commands::Show(args)) => commands::show::run(ctx, &args),
        Some(Commands::Delete(args)) => commands::delete::run(ctx, &args),
        Some(Commands::Rename(args)) => commands::rename::run(ctx, &args),
        Some(Commands::Field(args)) => commands::field::run(ctx, &args),
        Some(Commands::Check(args)) => commands::check::run(ctx, &args),
        Some(Commands::Preview(args)) => commands::preview::run(ctx, &args),
        Some(Commands::Fill(args)) => commands::fill::run(ctx, &args),
        Some(Commands::Import(args)) => commands::import::run(ctx, &args),
        Some(Commands::Export(args)) => commands::export::run(ctx, &args),
        Some(Commands::ExportAll(args)) => commands::export::run_all(ctx, &args),
        Some(Commands::Completion(args)) => commands::completion::run(ctx, &args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}
