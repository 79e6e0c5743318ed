use std::io::{BufRead, Write};

use anyhow::Context;
use infer_client::credentials::Credentials;

use crate::app_config::SavedCredentials;
use crate::context::CliContext;

fn prompt_api_key() -> anyhow::Result<String> {
    print!("Enter your API key: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read the API key")?;
    Ok(line.trim().to_string())
}

pub fn handle_command(context: CliContext) -> anyhow::Result<()> {
    let app_config = context
        .app_config()
        .context("No configuration directory available to save credentials in")?;

    let api_key = match context.explicit_api_key() {
        Some(api_key) => api_key.to_string(),
        None => prompt_api_key()?,
    };
    if api_key.is_empty() {
        println!("Login cancelled.");
        return Ok(());
    }
    let credentials = Credentials::new(api_key)?;

    app_config
        .save_credentials(&SavedCredentials::from(&credentials))
        .context("Failed to save credentials")?;
    println!(
        "Credentials saved to {}.",
        app_config.credentials_path().display()
    );
    Ok(())
}
