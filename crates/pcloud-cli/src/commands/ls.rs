//! `pcloud ls`: lists a folder.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use pcloud::{Metadata, api::folder::ListFolderRequest};

use super::{into_data, load_client, whoami::human_size};

#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder to list; `0` is the root.
    #[arg(default_value_t = 0)]
    pub folderid: u64,

    /// Walk the whole tree below the folder.
    #[arg(short, long)]
    pub recursive: bool,
}

/// # Errors
///
/// Fails without a token or if the listing fails.
pub async fn run(args: &LsArgs) -> Result<()> {
    let client = load_client()?;
    let request = ListFolderRequest::new(args.folderid).recursive(args.recursive);
    let response = client
        .folders()
        .list(&request)
        .await
        .context("failed to list folder")?;
    let folder = into_data(response, "listfolder")?;
    let metadata = folder
        .metadata
        .context("the server returned no folder metadata")?;

    println!("{}", style(metadata.path.as_deref().unwrap_or(&metadata.name)).bold());
    for line in render_tree(&metadata) {
        println!("{line}");
    }
    Ok(())
}

/// Renders the children of `folder`, folders first, indented by depth.
fn render_tree(folder: &Metadata) -> Vec<String> {
    let mut lines = Vec::new();
    push_children(folder, 0, &mut lines);
    lines
}

fn push_children(folder: &Metadata, depth: usize, lines: &mut Vec<String>) {
    let mut children: Vec<&Metadata> = folder.children().collect();
    children.sort_by(|a, b| b.isfolder.cmp(&a.isfolder).then_with(|| a.name.cmp(&b.name)));

    let indent = "  ".repeat(depth);
    for child in children {
        let id = child.numeric_id().map_or_else(String::new, |id| format!("{id}"));
        if child.isfolder {
            lines.push(format!("{indent}{}/  [{id}]", child.name));
            push_children(child, depth + 1, lines);
        } else {
            let size = child.size.map_or_else(String::new, human_size);
            lines.push(format!("{indent}{}  [{id}] {size}", child.name));
        }
    }
}
