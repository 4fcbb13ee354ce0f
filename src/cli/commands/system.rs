use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::validation::{optional_text, require_name};
use crate::utils::build_info;

use super::records::{print_rows, transaction_rows, TRANSACTION_HEADERS};
use super::usage_error;

pub(crate) fn cmd_stats(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("stats"));
    }
    let stats = ctx.store().get_stats();
    output::section("Dashboard");
    output::info(format!("Income: {}", ctx.format_amount(stats.income_total)));
    output::info(format!("Expenses: {}", ctx.format_amount(stats.expense_total)));
    output::info(format!("Balance: {}", ctx.format_amount(stats.balance)));
    output::info(format!("Transactions: {}", stats.transaction_count));
    Ok(())
}

pub(crate) fn cmd_recent(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => ctx.config().recent_limit,
        [count] => count.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{count}` is not a valid count"))
        })?,
        _ => return Err(usage_error("recent")),
    };
    let recent = ctx.store().recent_transactions(limit);
    let rows = transaction_rows(ctx, &recent);
    print_rows("transactions", &TRANSACTION_HEADERS, &rows);
    Ok(())
}

pub(crate) fn cmd_size(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let size = ctx.store().storage_size();
    output::info(format!("Storage used: {size}"));
    Ok(())
}

pub(crate) fn cmd_clear(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !ctx.confirm("Delete every transaction, category, account and note?")? {
        output::info("Clear cancelled.");
        return Ok(());
    }
    ctx.store_mut().clear_storage()?;
    output::success("All ledger data cleared.");
    Ok(())
}

pub(crate) fn cmd_seed(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match ctx.store_mut().seed_sample_data() {
        0 => output::info("Categories and accounts already exist; nothing added."),
        added => output::success(format!("Added {added} sample records.")),
    }
    Ok(())
}

pub(crate) fn cmd_guest(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let state = if ctx.store().session().guest { "on" } else { "off" };
            output::info(format!("Guest mode is {state}."));
        }
        ["on"] => {
            ctx.store_mut().set_guest_mode(true);
            output::success("Guest mode enabled.");
        }
        ["off"] => {
            ctx.store_mut().set_guest_mode(false);
            output::success("Guest mode disabled.");
        }
        _ => return Err(usage_error("guest")),
    }
    Ok(())
}

pub(crate) fn cmd_profile(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, email) = match args {
        [name] => (require_name("name", name)?, None),
        [name, email] => (require_name("name", name)?, optional_text(Some(*email))),
        _ => return Err(usage_error("profile")),
    };
    let session = ctx.store_mut().set_profile(name, email);
    output::success(format!("Signed in as {}.", session.display_name()));
    Ok(())
}

pub(crate) fn cmd_sign_out(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    ctx.store_mut().sign_out();
    output::success("Signed out.");
    Ok(())
}

pub(crate) fn cmd_whoami(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = ctx.store().session();
    match &session.profile {
        Some(profile) => match profile.email.as_deref() {
            Some(email) => output::info(format!("{} <{}>", profile.name, email)),
            None => output::info(&profile.name),
        },
        None => output::info(session.display_name()),
    }
    Ok(())
}

pub(crate) fn cmd_version(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::info(meta.summary());
    output::info(format!("Built: {}", meta.timestamp));
    output::info(format!("Target: {}", meta.target));
    output::info(format!("Compiler: {}", meta.rustc));
    Ok(())
}

pub(crate) fn cmd_help(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let registry = ctx.registry();
    match args {
        [] => {
            output::section("Commands");
            for entry in registry.list() {
                println!("  {:<10} {}", entry.name, entry.description);
            }
        }
        [name] => match registry.get(&name.to_ascii_lowercase()) {
            Some(entry) => {
                output::info(entry.description);
                output::info(format!("usage: {}", entry.usage));
            }
            None => ctx.suggest_command(name),
        },
        _ => return Err(usage_error("help")),
    }
    Ok(())
}

pub(crate) fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
