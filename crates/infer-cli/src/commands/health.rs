use anyhow::Context;

use crate::context::CliContext;

pub fn handle_command(context: CliContext) -> anyhow::Result<()> {
    let endpoint = context
        .endpoint()
        .context("Failed to create the endpoint client")?;
    let health = endpoint
        .health()
        .with_context(|| format!("Failed to query the health of endpoint {}", endpoint.id()))?;

    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}
