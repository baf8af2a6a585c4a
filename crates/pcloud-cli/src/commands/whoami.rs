//! `pcloud whoami`: shows the account behind the stored token.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use pcloud::api::general::UserInfoResponse;

use super::{into_data, load_client};

#[derive(Debug, Args)]
pub struct WhoamiArgs {}

/// # Errors
///
/// Fails without a token or if the request fails.
pub async fn run(_args: &WhoamiArgs) -> Result<()> {
    let client = load_client()?;
    let response = client
        .general()
        .user_info()
        .await
        .context("failed to fetch user info")?;
    let info = into_data(response, "userinfo")?;
    print!("{}", render(&info));
    Ok(())
}

fn render(info: &UserInfoResponse) -> String {
    let mut out = String::new();
    let email = info.email.as_deref().unwrap_or("<unknown>");
    out.push_str(&format!("{} {email}\n", style("Account:").bold()));
    if let Some(userid) = info.userid {
        out.push_str(&format!("  user id: {userid}\n"));
    }
    out.push_str(&format!(
        "  plan:    {}\n",
        if info.premium { "premium" } else { "free" }
    ));
    if let (Some(used), Some(quota)) = (info.usedquota, info.quota) {
        out.push_str(&format!(
            "  storage: {} of {}\n",
            human_size(used),
            human_size(quota)
        ));
    }
    out
}

/// Formats a byte count with a binary unit, e.g. `1.5 GiB`.
pub(crate) fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut unit = 0;
    let mut scaled = bytes;
    let mut remainder = 0;
    while scaled >= 1024 && unit < UNITS.len() - 1 {
        remainder = scaled % 1024;
        scaled /= 1024;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{scaled}.{} {}", remainder * 10 / 1024, UNITS[unit])
    }
}
