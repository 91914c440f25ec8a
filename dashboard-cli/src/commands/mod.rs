pub mod auth;
pub mod dashboard;
pub mod files;
pub mod projects;
pub mod users;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use api_client::{FetchOutcome, FileDeckClient};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Token that is cancelled when the user presses Ctrl-C
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received, cancelling fetch");
            child.cancel();
        }
    });
    token
}

/// Items of a finished fetch, or `None` after telling the user it was cancelled
pub fn completed<T>(outcome: FetchOutcome<T>) -> Option<Vec<T>> {
    let items = outcome.into_items();
    if items.is_none() {
        eprintln!("Cancelled.");
    }
    items
}

pub fn require_login(client: &FileDeckClient) -> Result<()> {
    if !client.context().is_authenticated() {
        bail!("Not signed in. Run `filedeck login <email>` first.");
    }
    Ok(())
}

pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim().to_string())
}

pub fn confirm(message: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", message))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "--".to_string(),
    }
}
