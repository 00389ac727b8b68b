//! Cashflow CLI - a personal budget kept in a single file
//!
//! This is the command-line interface for Cashflow. Each invocation opens
//! the budget, performs one operation through the core library, and writes
//! the result back, so every change stays undoable across invocations.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;
mod ui;

use std::sync::Once;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use app::AppContext;
use cli::{Cli, Commands};
use commands::{catalog, files, history, misc, periods, register};
use constants::LOG_ENV;
use errors::exit_code_for;

static TRACING_INIT: Once = Once::new();

/// Log to stderr, filtered by CASHFLOW_LOG (default: warn).
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let message = format!("{}", e);
        let (message, hint) = split_hint(&message);
        ui::print_error(ctx.ui(), message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint: ") {
        Some(idx) => (&error[..idx], Some(&error[idx + "\nHint: ".len()..])),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::New(args) => files::handle_new(ctx, args),
        Commands::Status => history::handle_status(ctx),
        Commands::Undo(args) => history::handle_undo(ctx, args),
        Commands::Redo(args) => history::handle_redo(ctx, args),
        Commands::History => history::handle_history(ctx),
        Commands::Period(args) => periods::handle_period(ctx, &args.command),
        Commands::Category(args) => catalog::handle_category(ctx, &args.command),
        Commands::Item(args) => catalog::handle_item(ctx, &args.command),
        Commands::Register(args) => register::handle_register(ctx, &args.command),
        Commands::Summary(args) => periods::handle_summary(ctx, args),
        Commands::SaveAs(args) => files::handle_save_as(ctx, args),
        Commands::Backup(args) => files::handle_backup(ctx, args),
        Commands::Export(args) => files::handle_export(ctx, args),
        Commands::Recent => files::handle_recent(ctx),
        Commands::Completions(args) => misc::handle_completions(args),
    }
}
