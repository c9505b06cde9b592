use anyhow::{Context, Result};
use std::io::{self, Write};

use crate::api::ApiClient;
use crate::auth::AuthContext;

/// Prompt for credentials on the terminal and save the resulting session.
pub async fn run_login(
    client: &mut ApiClient,
    auth: &mut AuthContext,
    username: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(name) => name,
        None => prompt("Username: ")?,
    };
    anyhow::ensure!(!username.is_empty(), "Username is required");

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    anyhow::ensure!(!password.is_empty(), "Password is required");

    auth.login(client, &username, &password)
        .await
        .context("Login failed. Check your username and password.")?;
    let user = client.me().await.context("Signed in, but fetching the profile failed")?;
    println!("Logged in as {} <{}>. Session saved.", user.username, user.email);
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
