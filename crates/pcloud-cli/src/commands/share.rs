//! `pcloud share`: invites someone to a folder.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use pcloud::{Permissions, api::sharing::ShareFolderRequest};

use super::{into_data, load_client};

#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Folder to share.
    pub folderid: u64,

    /// Mail address of the recipient.
    pub mail: String,

    /// Comma-separated permissions: any of create, modify, delete.
    #[arg(long, value_parser = parse_permissions)]
    pub permissions: Permissions,

    /// Message included in the invitation.
    #[arg(long)]
    pub message: Option<String>,
}

fn parse_permissions(value: &str) -> Result<Permissions, String> {
    value
        .parse::<Permissions>()
        .map_err(|e| format!("invalid permissions: {e}"))
}

/// # Errors
///
/// Fails on a blank address, without a token, or if the request fails.
pub async fn run(args: &ShareArgs) -> Result<()> {
    let mut request = ShareFolderRequest::new(args.folderid, args.mail.as_str(), args.permissions)?;
    if let Some(message) = &args.message {
        request = request.message(message.as_str());
    }

    let client = load_client()?;
    let response = client
        .sharing()
        .share_folder(&request)
        .await
        .context("failed to share folder")?;
    into_data(response, "sharefolder")?;
    println!(
        "{} Invited {} to folder {} ({})",
        style("✓").green(),
        args.mail,
        args.folderid,
        args.permissions
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pcloud::Permission;

    use super::*;

    #[test]
    fn test_parse_permissions_accepts_list() {
        let permissions = parse_permissions("create,delete").unwrap();
        assert!(permissions.contains(Permission::Create));
        assert!(!permissions.contains(Permission::Modify));
        assert!(permissions.contains(Permission::Delete));
    }

    #[test]
    fn test_parse_permissions_rejects_unknown_name() {
        assert!(parse_permissions("create,admin").is_err());
        assert!(parse_permissions("").is_err());
    }
}
