//! Application context for the Cashflow CLI.
//!
//! Every invocation opens the budget into a [`Session`], runs one
//! operation, and writes the result back to the same file.

use std::path::{Path, PathBuf};

use cashflow_core::Session;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::ui::{OutputFlags, UiContext};

use super::resolver::{missing_budget_message, record_recent, resolve_budget_path};

/// Application context that bundles CLI args with the resolved UI settings.
pub struct AppContext<'a> {
    cli: &'a Cli,
    ui: UiContext,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            ui: UiContext::detect(OutputFlags {
                json: cli.json,
                plain: cli.plain,
                no_color: cli.no_color,
                ascii: cli.ascii,
            }),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Path of the budget this invocation works on; it must exist.
    pub fn budget_path(&self) -> anyhow::Result<PathBuf> {
        let path = resolve_budget_path(self.cli)?;
        if !path.exists() {
            return Err(missing_budget_message(&path).into());
        }
        Ok(path)
    }

    /// Open the budget for reading.
    pub fn open_session(&self) -> anyhow::Result<Session> {
        let path = self.budget_path()?;
        let session = Session::open(&path)?;
        self.remember(&path);
        Ok(session)
    }

    /// Open the budget, run `edit`, and save the result back.
    ///
    /// Nothing is written when `edit` fails.
    pub fn edit<T, F>(&self, edit: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut Session) -> anyhow::Result<T>,
    {
        let mut session = self.open_session()?;
        let value = edit(&mut session)?;
        session.save()?;
        debug!(status = ?session.status(), "budget written back");
        Ok(value)
    }

    /// Push `path` to the recent-files list. Failures only warn.
    pub fn remember(&self, path: &Path) {
        if let Err(err) = record_recent(path) {
            warn!(file = %path.display(), error = %err, "could not update recent files");
        }
    }
}
