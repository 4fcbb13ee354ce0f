//! CRUD commands for categories, accounts, transactions and notes.

use chrono::{DateTime, Local, Utc};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::validation::{optional_text, parse_amount, require_name};
use crate::domain::{
    Displayable, NewAccount, NewCategory, NewNote, NewTransaction, Note, RecordId, Transaction,
    TransactionFilter, TransactionKind,
};

use super::{parse_id, usage_error};

const RECURRING_FLAG: &str = "recurring";

pub(crate) fn cmd_category(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["add", rest @ ..] => {
            let (name, description) = named_fields("category", rest)?;
            let category = ctx.store_mut().add_category(NewCategory {
                owner: None,
                name,
                description,
            });
            output::success(format!(
                "Category `{}` added (id {}).",
                category.name, category.id
            ));
            Ok(())
        }
        ["edit", id, rest @ ..] => {
            let id = parse_id(id)?;
            let (name, description) = named_fields("category", rest)?;
            let Some(mut category) = ctx.store().ledger().category(id).cloned() else {
                return missing("category", id);
            };
            category.name = name;
            category.description = description;
            ctx.store_mut().update_category(category);
            output::success(format!("Category {id} updated."));
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            match ctx.store_mut().remove_category(id) {
                Some(category) => output::success(format!("Category `{}` removed.", category.name)),
                None => return missing("category", id),
            }
            Ok(())
        }
        [] | ["list"] => {
            let rows = ctx
                .store()
                .list_categories()
                .iter()
                .map(|category| {
                    vec![
                        category.id.to_string(),
                        category.name.clone(),
                        category.description.clone().unwrap_or_default(),
                    ]
                })
                .collect::<Vec<_>>();
            print_rows("categories", &["ID", "NAME", "DESCRIPTION"], &rows);
            Ok(())
        }
        _ => Err(usage_error("category")),
    }
}

pub(crate) fn cmd_account(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["add", rest @ ..] => {
            let (name, description) = named_fields("account", rest)?;
            let account = ctx.store_mut().add_account(NewAccount {
                owner: None,
                name,
                description,
            });
            output::success(format!(
                "Account `{}` added (id {}).",
                account.name, account.id
            ));
            Ok(())
        }
        ["edit", id, rest @ ..] => {
            let id = parse_id(id)?;
            let (name, description) = named_fields("account", rest)?;
            let Some(mut account) = ctx.store().ledger().account(id).cloned() else {
                return missing("account", id);
            };
            account.name = name;
            account.description = description;
            ctx.store_mut().update_account(account);
            output::success(format!("Account {id} updated."));
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            match ctx.store_mut().remove_account(id) {
                Some(account) => output::success(format!("Account `{}` removed.", account.name)),
                None => return missing("account", id),
            }
            Ok(())
        }
        [] | ["list"] => {
            let rows = ctx
                .store()
                .list_accounts()
                .iter()
                .map(|account| {
                    vec![
                        account.id.to_string(),
                        account.name.clone(),
                        account.description.clone().unwrap_or_default(),
                    ]
                })
                .collect::<Vec<_>>();
            print_rows("accounts", &["ID", "NAME", "DESCRIPTION"], &rows);
            Ok(())
        }
        _ => Err(usage_error("account")),
    }
}

pub(crate) fn cmd_transaction(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["add", rest @ ..] => {
            let draft = transaction_fields(rest)?;
            let txn = ctx.store_mut().add_transaction(draft);
            output::success(format!(
                "Transaction {} recorded: {} {}.",
                txn.id,
                txn.kind,
                ctx.format_amount(txn.amount)
            ));
            Ok(())
        }
        ["edit", id, rest @ ..] => {
            let id = parse_id(id)?;
            let draft = transaction_fields(rest)?;
            let Some(mut txn) = ctx.store().ledger().transaction(id).cloned() else {
                return missing("transaction", id);
            };
            txn.kind = draft.kind;
            txn.amount = draft.amount;
            txn.category_id = draft.category_id;
            txn.account_id = draft.account_id;
            txn.is_recursive = draft.is_recursive;
            ctx.store_mut().update_transaction(txn);
            output::success(format!("Transaction {id} updated."));
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            match ctx.store_mut().remove_transaction(id) {
                Some(txn) => output::success(format!("Transaction {} removed.", txn.id)),
                None => return missing("transaction", id),
            }
            Ok(())
        }
        [] | ["list"] => list_transactions(ctx, TransactionFilter::All),
        ["list", filter] => {
            let filter = filter
                .parse::<TransactionFilter>()
                .map_err(CommandError::InvalidArguments)?;
            list_transactions(ctx, filter)
        }
        _ => Err(usage_error("txn")),
    }
}

pub(crate) fn cmd_note(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["add", title, content @ ..] => {
            let title = require_name("title", title)?;
            let content = note_content(content)?;
            let note = ctx.store_mut().add_note(NewNote::new(title, content));
            output::success(format!("Note `{}` added (id {}).", note.title, note.id));
            Ok(())
        }
        ["edit", id, title, content @ ..] => {
            let id = parse_id(id)?;
            let title = require_name("title", title)?;
            let content = note_content(content)?;
            let Some(mut note) = ctx.store().ledger().note(id).cloned() else {
                return missing("note", id);
            };
            note.title = title;
            note.content = content;
            ctx.store_mut().update_note(note);
            output::success(format!("Note {id} updated."));
            Ok(())
        }
        ["rm", id] => {
            let id = parse_id(id)?;
            match ctx.store_mut().remove_note(id) {
                Some(note) => output::success(format!("Note `{}` deleted.", note.title)),
                None => return missing("note", id),
            }
            Ok(())
        }
        ["trash", id] => {
            let id = parse_id(id)?;
            match ctx.store_mut().trash_note(id) {
                Some(note) => output::success(format!("Note `{}` moved to trash.", note.title)),
                None => return missing("note", id),
            }
            Ok(())
        }
        ["restore", id] => {
            let id = parse_id(id)?;
            match ctx.store_mut().restore_note(id) {
                Some(note) => output::success(format!("Note `{}` restored.", note.title)),
                None => return missing("note", id),
            }
            Ok(())
        }
        [] | ["list"] => {
            let rows = note_rows(ctx.store().list_notes());
            print_rows("notes", &["ID", "UPDATED", "NOTE"], &rows);
            Ok(())
        }
        ["list", "trashed"] => {
            let rows = note_rows(ctx.store().list_trashed_notes());
            print_rows("trashed notes", &["ID", "UPDATED", "NOTE"], &rows);
            Ok(())
        }
        _ => Err(usage_error("note")),
    }
}

pub(crate) fn transaction_rows(
    ctx: &ShellContext,
    transactions: &[&Transaction],
) -> Vec<Vec<String>> {
    transactions
        .iter()
        .map(|txn| {
            vec![
                txn.id.to_string(),
                local_time(txn.created_at),
                txn.kind.to_string(),
                ctx.format_amount(txn.amount),
                ctx.store().category_name(txn.category_id).to_string(),
                ctx.store().account_name(txn.account_id).to_string(),
                if txn.is_recursive { "yes" } else { "" }.to_string(),
            ]
        })
        .collect()
}

pub(crate) const TRANSACTION_HEADERS: [&str; 7] =
    ["ID", "DATE", "TYPE", "AMOUNT", "CATEGORY", "ACCOUNT", "RECURRING"];

fn list_transactions(ctx: &ShellContext, filter: TransactionFilter) -> CommandResult {
    let transactions = ctx.store().transactions_by_kind(filter);
    let rows = transaction_rows(ctx, &transactions);
    print_rows("transactions", &TRANSACTION_HEADERS, &rows);
    Ok(())
}

pub(crate) fn print_rows(what: &str, headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        output::info(format!("No {what} yet."));
    } else {
        output::table(headers, rows);
    }
}

fn note_rows(notes: Vec<&Note>) -> Vec<Vec<String>> {
    notes
        .into_iter()
        .map(|note| {
            vec![
                note.id.to_string(),
                local_time(note.updated_at),
                note.display_label(),
            ]
        })
        .collect()
}

fn named_fields(what: &str, args: &[&str]) -> Result<(String, Option<String>), CommandError> {
    match args {
        [name] => Ok((require_name("name", name)?, None)),
        [name, description] => Ok((require_name("name", name)?, optional_text(Some(*description)))),
        _ => Err(usage_error(what)),
    }
}

fn transaction_fields(args: &[&str]) -> Result<NewTransaction, CommandError> {
    let (fields, recurring) = match args {
        [kind, amount, category, account] => ([*kind, *amount, *category, *account], false),
        [kind, amount, category, account, flag] if flag.eq_ignore_ascii_case(RECURRING_FLAG) => {
            ([*kind, *amount, *category, *account], true)
        }
        _ => return Err(usage_error("txn")),
    };
    let [kind, amount, category, account] = fields;
    let kind = kind
        .parse::<TransactionKind>()
        .map_err(CommandError::InvalidArguments)?;
    let mut draft = NewTransaction::new(
        kind,
        parse_amount(amount)?,
        parse_id(category)?,
        parse_id(account)?,
    );
    draft.is_recursive = recurring;
    Ok(draft)
}

fn note_content(parts: &[&str]) -> Result<String, CommandError> {
    match parts {
        [] => Ok(String::new()),
        [content] => Ok(content.to_string()),
        _ => Err(usage_error("note")),
    }
}

fn missing(what: &str, id: RecordId) -> CommandResult {
    output::warning(format!("No {what} with id {id}."));
    Ok(())
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
