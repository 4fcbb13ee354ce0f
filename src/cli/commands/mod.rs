mod records;
mod system;

use once_cell::sync::Lazy;

use crate::domain::RecordId;

use super::context::CommandError;
use super::registry::{CommandEntry, CommandRegistry};

/// Every shell command, in the order `help` lists them.
pub(crate) static REGISTRY: Lazy<CommandRegistry> = Lazy::new(|| {
    let mut registry = CommandRegistry::new();
    register_all(&mut registry);
    registry
});

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = [
        CommandEntry::new(
            "category",
            "Manage categories",
            "category add <name> [description] | edit <id> <name> [description] | rm <id> | list",
            records::cmd_category,
        ),
        CommandEntry::new(
            "account",
            "Manage accounts",
            "account add <name> [description] | edit <id> <name> [description] | rm <id> | list",
            records::cmd_account,
        ),
        CommandEntry::new(
            "txn",
            "Manage transactions",
            "txn add <income|expense> <amount> <category_id> <account_id> [recurring] | edit <id> <income|expense> <amount> <category_id> <account_id> [recurring] | rm <id> | list [all|income|expense]",
            records::cmd_transaction,
        ),
        CommandEntry::new(
            "note",
            "Manage notes",
            "note add <title> [content] | edit <id> <title> [content] | rm <id> | trash <id> | restore <id> | list [trashed]",
            records::cmd_note,
        ),
        CommandEntry::new(
            "stats",
            "Show income, expenses and balance",
            "stats",
            system::cmd_stats,
        ),
        CommandEntry::new(
            "recent",
            "Show the most recent transactions",
            "recent [count]",
            system::cmd_recent,
        ),
        CommandEntry::new(
            "size",
            "Show how much storage the ledger uses",
            "size",
            system::cmd_size,
        ),
        CommandEntry::new(
            "clear",
            "Delete every record and the stored ledger",
            "clear",
            system::cmd_clear,
        ),
        CommandEntry::new(
            "seed",
            "Add the default categories and accounts",
            "seed",
            system::cmd_seed,
        ),
        CommandEntry::new(
            "guest",
            "Show or toggle guest mode",
            "guest [on|off]",
            system::cmd_guest,
        ),
        CommandEntry::new(
            "profile",
            "Sign in with a local profile",
            "profile <name> [email]",
            system::cmd_profile,
        ),
        CommandEntry::new("signout", "Sign out", "signout", system::cmd_sign_out),
        CommandEntry::new(
            "whoami",
            "Show the current session",
            "whoami",
            system::cmd_whoami,
        ),
        CommandEntry::new(
            "version",
            "Show build information",
            "version",
            system::cmd_version,
        ),
        CommandEntry::new(
            "help",
            "List commands or show usage",
            "help [command]",
            system::cmd_help,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", system::cmd_exit),
    ];
    for entry in entries {
        registry.register(entry);
    }
}

pub(crate) fn usage_error(command: &str) -> CommandError {
    let usage = REGISTRY
        .get(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

pub(crate) fn parse_id(raw: &str) -> Result<RecordId, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))
}
