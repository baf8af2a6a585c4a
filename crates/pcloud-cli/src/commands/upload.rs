//! `pcloud upload`: uploads a local file into a folder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use pcloud::api::file::UploadFileRequest;
use tracing::info;

use super::{into_data, load_client};

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Destination folder id; `0` is the root.
    pub folderid: u64,

    /// Local file to upload.
    pub path: PathBuf,

    /// Keep an existing file with the same name and store the upload under a
    /// new name instead of overwriting it.
    #[arg(long)]
    pub rename_if_exists: bool,
}

/// # Errors
///
/// Fails if the file cannot be read, without a token, or if the upload fails.
pub async fn run(args: &UploadArgs) -> Result<()> {
    let filename = file_name(&args.path)?;
    let content = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    info!(file = %filename, bytes = content.len(), folderid = args.folderid, "uploading");

    let request = UploadFileRequest::new(args.folderid, filename, content)?
        .rename_if_exists(args.rename_if_exists);
    let client = load_client()?;
    let response = client
        .files()
        .upload(&request)
        .await
        .context("upload failed")?;
    let uploaded = into_data(response, "uploadfile")?;

    for (id, metadata) in uploaded.fileids.iter().zip(&uploaded.metadata) {
        println!(
            "{} Uploaded {} [{id}]",
            style("✓").green(),
            metadata.name
        );
    }
    Ok(())
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .with_context(|| format!("{} has no usable file name", path.display()))
}
