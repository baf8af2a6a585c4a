//! `pcloud mkdir`: creates a folder if it does not exist yet.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use pcloud::{Metadata, api::folder::CreateFolderRequest};

use super::{into_data, load_client};

#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Parent folder id; `0` is the root.
    pub parent: u64,

    /// Name of the new folder.
    pub name: String,
}

/// # Errors
///
/// Fails on a blank name, without a token, or if the request fails.
pub async fn run(args: &MkdirArgs) -> Result<()> {
    let request = CreateFolderRequest::new(args.parent, args.name.as_str())?;
    let client = load_client()?;
    let response = client
        .folders()
        .create_if_not_exists(&request)
        .await
        .context("failed to create folder")?;
    let folder = into_data(response, "createfolderifnotexists")?;

    let id = folder
        .metadata
        .as_ref()
        .and_then(Metadata::numeric_id)
        .map_or_else(|| "?".to_owned(), |id| format!("{id}"));
    if folder.created == Some(false) {
        println!("{} {} already exists [{id}]", style("•").dim(), args.name);
    } else {
        println!("{} Created {} [{id}]", style("✓").green(), args.name);
    }
    Ok(())
}
