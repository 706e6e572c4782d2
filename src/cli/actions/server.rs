use crate::cli::actions::Action;
use crate::gardi;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
        } => {
            // Reject an unparseable DSN before the pool ever sees it.
            let dsn = Url::parse(&dsn).context("Invalid database DSN")?;

            gardi::new(port, dsn.to_string(), token_secret).await?;
        }
    }

    Ok(())
}
