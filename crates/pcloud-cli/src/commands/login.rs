//! `pcloud login`: obtains an access token through the OAuth code flow.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use pcloud::api::auth::AuthorizeRequest;
use tracing::debug;

use super::{build_client, into_data};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Authorization code shown after approving the app. Without it, the
    /// authorize URL is printed instead.
    #[arg(long)]
    pub code: Option<String>,
}

/// Prints the authorize URL, or exchanges `--code` for a token and stores it.
///
/// # Errors
///
/// Fails if `client_id` or `client_secret` is missing from the
/// configuration, or if the exchange or the config write fails.
pub async fn run(args: &LoginArgs) -> Result<()> {
    let mut config = Config::load().context("failed to load configuration")?;
    let client_id = config
        .client_id
        .clone()
        .context("client_id is not set in the configuration")?;
    let client = build_client(&config, "")?;

    let Some(code) = args.code.as_deref() else {
        let request = AuthorizeRequest::new(client_id)?;
        let url = client.auth().authorize_url(&request)?;
        println!("Open this URL, approve access, then run:");
        println!("  pcloud login --code <CODE>");
        println!();
        println!("{}", style(url).cyan());
        return Ok(());
    };

    let client_secret = config
        .client_secret
        .clone()
        .context("client_secret is not set in the configuration")?;
    let response = client
        .auth()
        .token(&client_id, &client_secret, code)
        .await
        .context("token exchange failed")?;
    let token = into_data(response, "token exchange")?;
    let access_token = token
        .access_token
        .context("the server returned no access token")?;
    debug!(uid = ?token.uid, "token issued");

    config.access_token = Some(access_token);
    let path = config.save().context("failed to save configuration")?;
    println!(
        "{} Logged in; token saved to {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}
