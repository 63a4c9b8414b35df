use std::{env, env::VarError};

use crate::config::public_env_defaults;

/// Any argument at all prints the help text and the current configuration, then exits.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Secrets are never in this list
    println!("Configuration (variables holding secrets are not shown):");
    println!("  {:<25} {:<35} {}", "Variable", "Current value", "Default");
    for (name, default) in public_env_defaults() {
        println!("  {name:<25} {:<35} {default}", current_value(name));
    }
}

fn current_value(name: &str) -> String {
    match env::var(name) {
        Ok(s) => s,
        Err(VarError::NotPresent) => "(not set)".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
