use std::env;
use std::process::Command;

const ENV_PREFIX: &str = "FINANCE_CORE_BUILD";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let entries = [
        ("HASH", short_commit()),
        ("STATUS", worktree_status()),
        ("TIMESTAMP", timestamp),
        ("TARGET", env_or("TARGET", "unknown-target")),
        ("PROFILE", env_or("PROFILE", "unknown-profile")),
        ("RUSTC", command_line("rustc", &["--version"]).unwrap_or_else(unknown)),
    ];

    for (suffix, value) in entries {
        println!("cargo:rustc-env={ENV_PREFIX}_{suffix}={value}");
    }
}

fn short_commit() -> String {
    command_line("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(unknown)
}

fn worktree_status() -> String {
    match command_line("git", &["status", "--porcelain"]) {
        Some(output) if output.is_empty() => "clean".into(),
        Some(_) => "dirty".into(),
        None => unknown(),
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn command_line(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}

fn unknown() -> String {
    "unknown".to_string()
}
