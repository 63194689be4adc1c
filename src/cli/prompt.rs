//! Interactive fallbacks for values not given on the command line.

use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};
use rollcall_models::Role;

pub fn text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

/// Optional text; an empty answer means none.
pub fn optional_text(value: Option<String>, prompt: &str) -> Result<Option<String>> {
    if value.is_some() {
        return Ok(value);
    }
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))?;
    Ok(Some(answer.trim().to_string()).filter(|a| !a.is_empty()))
}

pub fn number(value: Option<u8>, prompt: &str) -> Result<u8> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

pub fn password(value: Option<String>) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password"),
    }
}

/// New password with confirmation; returns it twice for the form.
pub fn new_password() -> Result<(String, String)> {
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()
        .context("Failed to read password")?;
    Ok((password.clone(), password))
}

pub fn role(value: Option<Role>) -> Result<Role> {
    if let Some(role) = value {
        return Ok(role);
    }
    let labels: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
    let index = Select::new()
        .with_prompt("Role")
        .items(&labels)
        .default(Role::ALL.len() - 1)
        .interact()
        .context("Failed to read role")?;
    Ok(Role::ALL[index])
}
