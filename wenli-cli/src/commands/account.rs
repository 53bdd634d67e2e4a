//! Account commands - register, login, logout, whoami

use std::env;

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::json;
use wenli_core::services::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

/// Minimum password length accepted at registration
const MIN_PASSWORD_LEN: usize = 6;

fn get_username(username_arg: Option<String>) -> Result<String> {
    let username = match username_arg {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("Username must not be empty");
    }
    Ok(username)
}

/// Password from --password, then WENLI_PASSWORD, then an interactive prompt
fn get_password(password_flag: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }
    if let Ok(p) = env::var("WENLI_PASSWORD") {
        return Ok(p);
    }

    let p1 = Password::new().with_prompt("Password").interact()?;
    if confirm {
        let p2 = Password::new().with_prompt("Confirm password").interact()?;
        if p1 != p2 {
            bail!("Passwords do not match");
        }
    }
    Ok(p1)
}

pub fn username_taken(username: &str) -> anyhow::Error {
    anyhow!("Username '{}' is already taken", username)
}

pub fn run_register(username: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let username = get_username(username)?;

    let ctx = get_context()?;
    let logger = get_logger();

    // Fail before prompting for a password nobody will use
    if ctx.identity.username_exists(&username)? {
        log_event(&logger, LogEvent::new("register_conflict").with_command("register"));
        return Err(username_taken(&username));
    }

    let password = get_password(password, true)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let Some(session) = ctx.register(&username, &password)? else {
        log_event(&logger, LogEvent::new("register_conflict").with_command("register"));
        return Err(username_taken(&username));
    };
    log_event(&logger, LogEvent::new("user_registered").with_command("register"));

    if json {
        return output::print_json(&session);
    }
    output::success(&format!("Registered and logged in as {}", session.username));
    Ok(())
}

pub fn run_login(username: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let username = get_username(username)?;
    let password = get_password(password, false)?;

    let ctx = get_context()?;
    let logger = get_logger();

    let Some(session) = ctx.login(&username, &password)? else {
        log_event(&logger, LogEvent::new("login_failed").with_command("login"));
        bail!("Invalid username or password");
    };
    log_event(&logger, LogEvent::new("user_logged_in").with_command("login"));

    if json {
        return output::print_json(&session);
    }
    output::success(&format!("Logged in as {}", session.username));
    Ok(())
}

pub fn run_logout(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let previous = ctx.current_session()?;
    ctx.logout()?;

    if json {
        return output::print_json(json!({ "loggedOut": previous.is_some() }));
    }
    match previous {
        Some(session) => output::success(&format!("Logged out {}", session.username)),
        None => output::info("Not logged in"),
    }
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.current_session()?;

    if json {
        return output::print_json(&session);
    }
    let Some(session) = session else {
        println!("{}", "Not logged in".dimmed());
        return Ok(());
    };

    println!("{}", session.username.bold());
    println!("  {}", format!("id: {}", session.id).dimmed());
    match ctx.identity.find_user(&session.id)? {
        Some(user) => println!(
            "  {}",
            format!("since: {}", user.created_at.format("%Y-%m-%d")).dimmed()
        ),
        None => output::warning("The logged-in user no longer exists; run 'wl doctor'"),
    }
    Ok(())
}
