//! `tack` -- kanban board CLI.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers. Each handler opens the board, replays its
//! gestures against the engine and prints the result.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn init_logging(verbose: bool) {
    let filter = if verbose {
        Some(EnvFilter::new("tack=debug"))
    } else {
        EnvFilter::try_from_default_env().ok()
    };
    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();
    let ctx = RuntimeContext::from_global_args(&cli.global);
    init_logging(ctx.verbose);

    let result = match cli.command {
        Some(Commands::Init(args)) => commands::init::run(&ctx, &args),
        Some(Commands::Create(args)) => commands::create::run(&ctx, &args),
        Some(Commands::List(args)) => commands::list::run(&ctx, &args),
        Some(Commands::Board(args)) => commands::board::run(&ctx, &args),
        Some(Commands::MoveCmd(args)) => commands::move_cmd::run(&ctx, &args),
        Some(Commands::Column(args)) => commands::column::run(&ctx, &args),
        Some(Commands::Bulk(args)) => commands::bulk::run(&ctx, &args),
        Some(Commands::Quick(args)) => commands::quick::run(&ctx, &args),
        Some(Commands::ToggleType(args)) => commands::task::run_toggle_type(&ctx, &args),
        Some(Commands::Delete(args)) => commands::task::run_delete(&ctx, &args),
        Some(Commands::Show(args)) => commands::show::run(&ctx, &args),
        Some(Commands::Timer(args)) => commands::timer::run(&ctx, &args),
        Some(Commands::Completion(args)) => commands::completion::run(&ctx, &args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

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
