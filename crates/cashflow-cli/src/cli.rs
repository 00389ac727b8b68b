use std::path::PathBuf;

use cashflow_core::{FlowKind, VERSION};
use clap::{Args, Parser, Subcommand};

/// Cashflow - a personal budget in a single file, with undo for every edit
#[derive(Parser)]
#[command(name = "cashflow")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the budget file
    #[arg(short, long, global = true, env = "CASHFLOW_FILE")]
    pub file: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Plain key=value output, even on a terminal
    #[arg(long, global = true)]
    pub plain: bool,

    /// Disable colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new budget with the default categories and items
    New(NewArgs),

    /// Show the file and undo/redo position
    Status,

    /// Undo the most recent change
    Undo(StepArgs),

    /// Redo the most recently undone change
    Redo(StepArgs),

    /// List every change in the undo log
    History,

    /// Manage periods
    Period(PeriodArgs),

    /// Manage categories
    Category(CategoryArgs),

    /// Manage items
    Item(ItemArgs),

    /// Manage the items registered in a period
    Register(RegisterArgs),

    /// Show flow, category and item totals for a period
    Summary(SummaryArgs),

    /// Save the budget under a new path
    SaveAs(SaveAsArgs),

    /// Write a copy of the budget to another path
    Backup(BackupArgs),

    /// Export every table as JSON
    Export(ExportArgs),

    /// List recently used budget files
    Recent,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Path of the budget file to create
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Make this the default budget file
    #[arg(long)]
    pub default: bool,
}

#[derive(Args)]
pub struct StepArgs {
    /// Number of changes to step over
    #[arg(short = 'n', long, default_value_t = 1, value_name = "COUNT")]
    pub steps: usize,
}

#[derive(Args)]
pub struct PeriodArgs {
    #[command(subcommand)]
    pub command: PeriodCommand,
}

#[derive(Subcommand)]
pub enum PeriodCommand {
    /// Add a period
    Add {
        /// Period name (e.g., "Jan 2026")
        name: String,
    },
    /// Rename a period
    Rename {
        /// Period id or name
        period: String,
        /// New name
        name: String,
    },
    /// Delete a period and everything registered in it
    Delete {
        /// Period id or name
        period: String,
    },
    /// Copy a period's register into a new or existing period
    Clone(CloneArgs),
    /// List periods with their balances
    List,
}

#[derive(Args)]
pub struct CloneArgs {
    /// Period to copy from (id or name)
    pub source: String,

    /// Existing period to copy into (id or name)
    #[arg(long, value_name = "PERIOD", conflicts_with = "name")]
    pub into: Option<String>,

    /// Name of the new period (default: "Clone of <source>")
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Flow the category belongs to (in or out)
        #[arg(long, default_value = "out")]
        flow: FlowKind,
    },
    /// Rename a category or move it to the other flow
    Rename {
        /// Category id or name
        category: String,
        /// New name
        name: String,
        /// Move to this flow (in or out)
        #[arg(long)]
        flow: Option<FlowKind>,
    },
    /// Delete a category that has no items
    Delete {
        /// Category id or name
        category: String,
    },
    /// List categories
    List {
        /// Only categories of this flow (in or out)
        #[arg(long)]
        flow: Option<FlowKind>,
    },
}

#[derive(Args)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub command: ItemCommand,
}

#[derive(Subcommand)]
pub enum ItemCommand {
    /// Add an item to a category
    Add {
        /// Item name
        name: String,
        /// Category id or name
        #[arg(short, long)]
        category: String,
    },
    /// Rename an item or move it to another category
    Rename {
        /// Item id, name, or "Category/Item"
        item: String,
        /// New name
        name: String,
        /// Move to this category (id or name)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an item that is not registered anywhere
    Delete {
        /// Item id, name, or "Category/Item"
        item: String,
    },
    /// List items
    List {
        /// Only items of this flow (in or out)
        #[arg(long)]
        flow: Option<FlowKind>,
        /// Only items of this category (id or name)
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    #[command(subcommand)]
    pub command: RegisterCommand,
}

#[derive(Subcommand)]
pub enum RegisterCommand {
    /// Register an item in a period
    Add {
        /// Period id or name
        period: String,
        /// Item id, name, or "Category/Item"
        item: String,
        /// Budgeted amount
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        budget: f64,
        /// Actual amount
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        actual: f64,
        /// Free-form note
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Change the amounts or note of a registered item
    Set {
        /// Period id or name
        period: String,
        /// Item id, name, or "Category/Item"
        item: String,
        /// Budgeted amount
        #[arg(short, long, allow_negative_numbers = true)]
        budget: Option<f64>,
        /// Actual amount
        #[arg(short, long, allow_negative_numbers = true)]
        actual: Option<f64>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove items from a period
    Remove {
        /// Period id or name
        period: String,
        /// Items to remove (id, name, or "Category/Item")
        #[arg(required_unless_present = "all")]
        items: Vec<String>,
        /// Remove every registered item
        #[arg(long)]
        all: bool,
        /// Remove entries holding amounts or notes without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// List the items registered in a period
    List {
        /// Period id or name
        period: String,
    },
    /// Register every item not yet in the period, with zero amounts
    Fill {
        /// Period id or name
        period: String,
        /// Register all of them without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Period id or name
    pub period: String,
}

#[derive(Args)]
pub struct SaveAsArgs {
    /// Destination path
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct BackupArgs {
    /// Destination path for the copy
    #[arg(value_name = "PATH")]
    pub destination: PathBuf,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flow_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["cashflow", "category", "add", "Pets", "--flow", "OUT"])
            .unwrap();
        match cli.command {
            Commands::Category(CategoryArgs {
                command: CategoryCommand::Add { name, flow },
            }) => {
                assert_eq!(name, "Pets");
                assert_eq!(flow, FlowKind::Out);
            }
            _ => panic!("expected category add"),
        }
    }

    #[test]
    fn test_clone_into_and_name_conflict() {
        let result = Cli::try_parse_from([
            "cashflow", "period", "clone", "Jan", "--into", "Feb", "--name", "Mar",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_register_remove_needs_items_or_all() {
        assert!(Cli::try_parse_from(["cashflow", "register", "remove", "Jan"]).is_err());
        assert!(Cli::try_parse_from(["cashflow", "register", "remove", "Jan", "--all"]).is_ok());
    }

    #[test]
    fn test_undo_steps_default_to_one() {
        let cli = Cli::try_parse_from(["cashflow", "undo"]).unwrap();
        match cli.command {
            Commands::Undo(args) => assert_eq!(args.steps, 1),
            _ => panic!("expected undo"),
        }
    }
}
