//! `pcloud link`: prints a direct download URL for a file.

use anyhow::{Context, Result};
use clap::Args;
use pcloud::api::streaming::FileLinkRequest;

use super::{into_data, load_client};

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// File to link.
    pub fileid: u64,

    /// Make browsers save the file instead of displaying it.
    #[arg(long)]
    pub force_download: bool,
}

/// # Errors
///
/// Fails without a token, if the request fails or if the server returns no
/// host.
pub async fn run(args: &LinkArgs) -> Result<()> {
    let client = load_client()?;
    let request = FileLinkRequest::new(args.fileid).force_download(args.force_download);
    let response = client
        .streaming()
        .file_link(&request)
        .await
        .context("failed to get file link")?;
    let link = into_data(response, "getfilelink")?;
    let url = link.url().context("the server returned no download host")?;
    println!("{url}");
    Ok(())
}
