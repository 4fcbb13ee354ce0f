//! Shell state, dispatch and error reporting.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::config::{Config, ConfigManager};
use crate::core::{LedgerStore, StoreOptions};
use crate::errors::LedgerError;
use crate::storage::JsonFileStore;

use super::commands::REGISTRY;
use super::output;
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Failures that stop the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures of a single command. The shell reports them and keeps going.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<LedgerError> for CommandError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidInput(message) => CommandError::InvalidArguments(message),
            other => CommandError::Core(other),
        }
    }
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    mode: CliMode,
    store: LedgerStore,
    config: Config,
    registry: &'static CommandRegistry,
    theme: ColorfulTheme,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Opens the ledger in the configured data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        let backend = JsonFileStore::new(manager.data_dir(&config))?;
        let store = LedgerStore::open(Box::new(backend), StoreOptions::from(&config));
        Ok(Self::with_store(mode, store, config))
    }

    pub fn with_store(mode: CliMode, store: LedgerStore, config: Config) -> Self {
        let mut context = Self {
            mode,
            store,
            config,
            registry: &REGISTRY,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.flush_warnings();
        context
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LedgerStore {
        &mut self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn registry(&self) -> &'static CommandRegistry {
        self.registry
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        format!("finance [{}]> ", self.store.session().display_name())
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let outcome = match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        };
        self.flush_warnings();
        outcome
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    /// Asks for confirmation in interactive mode; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    fn flush_warnings(&mut self) {
        for warning in self.store.take_warnings() {
            output::warning(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn context() -> ShellContext {
        let store = LedgerStore::open(Box::new(MemoryStore::new()), StoreOptions::default());
        ShellContext::with_store(CliMode::Script, store, Config::default())
    }

    #[test]
    fn handlers_mutate_the_store() {
        let mut ctx = context();
        ctx.dispatch("category", "category", &["add", "Food", "Groceries"])
            .unwrap();
        ctx.dispatch("account", "account", &["add", "Cash"]).unwrap();
        let category = ctx.store().list_categories()[0].id.to_string();
        let account = ctx.store().list_accounts()[0].id.to_string();
        ctx.dispatch(
            "txn",
            "txn",
            &["add", "expense", "12.5", category.as_str(), account.as_str()],
        )
        .unwrap();

        assert_eq!(ctx.store().get_stats().expense_total, 12.5);
        assert_eq!(
            ctx.store().list_categories()[0].description.as_deref(),
            Some("Groceries")
        );
    }

    #[test]
    fn form_validation_rejects_bad_amounts() {
        let mut ctx = context();
        let err = ctx
            .dispatch("txn", "txn", &["add", "income", "-4", "1", "2"])
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(ctx.store().list_transactions().is_empty());
    }

    #[test]
    fn exit_and_unknown_commands_do_not_fail() {
        let mut ctx = context();
        assert_eq!(
            ctx.dispatch("categroy", "categroy", &[]).unwrap(),
            LoopControl::Continue
        );
        assert_eq!(ctx.dispatch("exit", "exit", &[]).unwrap(), LoopControl::Exit);
    }

    #[test]
    fn scripts_clear_without_prompting() {
        let mut ctx = context();
        ctx.dispatch("seed", "seed", &[]).unwrap();
        assert_eq!(ctx.store().list_categories().len(), 3);
        ctx.dispatch("clear", "clear", &[]).unwrap();
        assert!(ctx.store().ledger().is_empty());
        assert_eq!(ctx.store().storage_size(), "0 KB");
    }
}
