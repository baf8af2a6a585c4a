//! Command-line front end for pCloud.
//!
//! Usage:
//! ```bash
//! pcloud login                          # Print the OAuth authorize URL
//! pcloud login --code <CODE>            # Exchange a code and store the token
//! pcloud whoami                         # Show the current account
//! pcloud ls [FOLDERID] [--recursive]    # List a folder
//! pcloud mkdir <PARENT> <NAME>          # Create a folder
//! pcloud upload <FOLDERID> <PATH>       # Upload a file
//! pcloud link <FILEID>                  # Print a download URL
//! pcloud share <FOLDERID> <MAIL> --permissions create,modify
//! ```
//!
//! Settings are read from `config.toml`; see [`config`]. Set `RUST_LOG` to
//! adjust log output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "pcloud", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authorize this tool and store an access token
    Login(commands::login::LoginArgs),

    /// Show the account behind the stored token
    Whoami(commands::whoami::WhoamiArgs),

    /// List a folder
    Ls(commands::ls::LsArgs),

    /// Create a folder unless it already exists
    Mkdir(commands::mkdir::MkdirArgs),

    /// Upload a local file
    Upload(commands::upload::UploadArgs),

    /// Print a download URL for a file
    Link(commands::link::LinkArgs),

    /// Share a folder with someone
    Share(commands::share::ShareArgs),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login(_) => f.debug_tuple("Login").finish(),
            Self::Whoami(_) => f.debug_tuple("Whoami").finish(),
            Self::Ls(_) => f.debug_tuple("Ls").finish(),
            Self::Mkdir(_) => f.debug_tuple("Mkdir").finish(),
            Self::Upload(_) => f.debug_tuple("Upload").finish(),
            Self::Link(_) => f.debug_tuple("Link").finish(),
            Self::Share(_) => f.debug_tuple("Share").finish(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("info".parse().context("failed to parse log directive")?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Login(args) => commands::login::run(args).await,
        Command::Whoami(args) => commands::whoami::run(args).await,
        Command::Ls(args) => commands::ls::run(args).await,
        Command::Mkdir(args) => commands::mkdir::run(args).await,
        Command::Upload(args) => commands::upload::run(args).await,
        Command::Link(args) => commands::link::run(args).await,
        Command::Share(args) => commands::share::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse_command(argv: &[&str]) -> Result<Command, clap::Error> {
        Ok(Cli::try_parse_from(argv.iter().copied())?.command)
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let err = Cli::try_parse_from(["pcloud"]).expect_err("expected clap parse error");
        assert!(
            matches!(
                err.kind(),
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::MissingSubcommand
            ),
            "unexpected error kind: {:?}",
            err.kind()
        );
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        let err = Cli::try_parse_from(["pcloud", "rm"]).expect_err("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_cli_login_code_is_optional() -> Result<(), clap::Error> {
        let Command::Login(args) = parse_command(&["pcloud", "login"])? else {
            panic!("expected Command::Login");
        };
        assert!(args.code.is_none());

        let Command::Login(args) = parse_command(&["pcloud", "login", "--code", "abc"])? else {
            panic!("expected Command::Login");
        };
        assert_eq!(args.code.as_deref(), Some("abc"));
        Ok(())
    }

    #[test]
    fn test_cli_ls_defaults_to_root() -> Result<(), clap::Error> {
        let Command::Ls(args) = parse_command(&["pcloud", "ls"])? else {
            panic!("expected Command::Ls");
        };
        assert_eq!(args.folderid, 0);
        assert!(!args.recursive);

        let Command::Ls(args) = parse_command(&["pcloud", "ls", "42", "--recursive"])? else {
            panic!("expected Command::Ls");
        };
        assert_eq!(args.folderid, 42);
        assert!(args.recursive);
        Ok(())
    }

    #[test]
    fn test_cli_mkdir_requires_name() {
        let err = Cli::try_parse_from(["pcloud", "mkdir", "0"]).expect_err("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_upload_parses_flag() -> Result<(), clap::Error> {
        let Command::Upload(args) =
            parse_command(&["pcloud", "upload", "7", "notes.txt", "--rename-if-exists"])?
        else {
            panic!("expected Command::Upload");
        };
        assert_eq!(args.folderid, 7);
        assert_eq!(args.path, std::path::PathBuf::from("notes.txt"));
        assert!(args.rename_if_exists);
        Ok(())
    }

    #[test]
    fn test_cli_link_rejects_non_numeric_id() {
        let err = Cli::try_parse_from(["pcloud", "link", "abc"]).expect_err("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_share_parses_permissions() -> Result<(), clap::Error> {
        let Command::Share(args) = parse_command(&[
            "pcloud",
            "share",
            "5",
            "friend@example.com",
            "--permissions",
            "create,modify",
        ])?
        else {
            panic!("expected Command::Share");
        };
        assert_eq!(args.permissions.bits(), 3);
        assert_eq!(args.mail, "friend@example.com");
        Ok(())
    }

    #[test]
    fn test_cli_share_rejects_bad_permissions() {
        let err = Cli::try_parse_from([
            "pcloud",
            "share",
            "5",
            "friend@example.com",
            "--permissions",
            "owner",
        ])
        .expect_err("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_share_requires_permissions() {
        let err = Cli::try_parse_from(["pcloud", "share", "5", "friend@example.com"])
            .expect_err("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
