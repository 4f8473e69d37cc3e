use anyhow::Result;
use clap::{Parser, Subcommand};

use git_semrel::cli::{self, CommitWorkflowArgs, LogWorkflowArgs, ReleaseWorkflowArgs};
use git_semrel::config;
use git_semrel::git::Git2Repository;
use git_semrel::ui;

#[derive(Parser, Debug)]
#[command(
    name = "git-semrel",
    version,
    about = "Conventional commits and semantic release tags"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the next release version and tag it
    Release {
        #[arg(long, help = "Revision to release (default: HEAD)")]
        from: Option<String>,

        #[arg(short, long, help = "Release tag prefix")]
        prefix: Option<String>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Check that history only contains conventional commits
    Check {
        #[arg(long, help = "Revision to check from")]
        from: Option<String>,

        #[arg(short, long, help = "Check every reference instead of one revision")]
        all: bool,
    },

    /// Commit staged changes with a conventional message
    Commit {
        #[arg(short, long, help = "Commit type, abbreviations allowed")]
        r#type: Option<String>,

        #[arg(short, long, help = "Commit scope")]
        scope: Option<String>,

        #[arg(short = 'B', long, help = "Mark as a breaking change")]
        breaking: bool,

        #[arg(short, long, help = "Commit body")]
        body: Option<String>,

        #[arg(short, long = "footer", help = "Footer line, may be repeated")]
        footers: Vec<String>,

        #[arg(long, help = "Print the message without committing")]
        dry_run: bool,

        /// Message, optionally starting with the type
        message: Vec<String>,
    },

    /// Show commit history with conventional commit details
    Log {
        #[arg(long, help = "Revision to start from (default: HEAD)")]
        from: Option<String>,

        #[arg(short, long, help = "Walk every reference instead of one revision")]
        all: bool,

        #[arg(short, long = "type", help = "Only show this commit type, may be repeated")]
        types: Vec<String>,

        #[arg(short, long = "scope", help = "Only show this scope, may be repeated")]
        scopes: Vec<String>,

        #[arg(short = 'B', long = "breaking-changes", help = "Only show breaking changes")]
        breaking_changes: bool,

        #[arg(long, help = "Stop at commits older than this date")]
        since: Option<String>,

        #[arg(long, help = "Skip commits newer than this date")]
        until: Option<String>,

        #[arg(long, help = "Disable colored output")]
        no_color: bool,
    },

    /// List release tags
    Tags {
        #[arg(short, long, help = "Release tag prefix")]
        prefix: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = config::load_config(cli.config.as_deref())?;
    let repo = Git2Repository::open(".")?;

    match cli.command {
        Command::Release {
            from,
            prefix,
            dry_run,
        } => {
            let args = ReleaseWorkflowArgs {
                from,
                tag_prefix: prefix,
                dry_run,
            };
            cli::run_release(&repo, &args, &config)?;
        }
        Command::Check { from, all } => {
            let from = from.unwrap_or_else(|| config.check.from.clone());
            cli::run_check(&repo, &from, all)?;
        }
        Command::Commit {
            r#type,
            scope,
            breaking,
            body,
            footers,
            dry_run,
            message,
        } => {
            let args = CommitWorkflowArgs {
                r#type,
                message,
                scope,
                breaking,
                body,
                footers,
                dry_run,
            };
            cli::run_commit(&repo, &args)?;
        }
        Command::Log {
            from,
            all,
            types,
            scopes,
            breaking_changes,
            since,
            until,
            no_color,
        } => {
            if no_color {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
            }
            let args = LogWorkflowArgs {
                from,
                all,
                types,
                scopes,
                breaking_only: breaking_changes,
                since,
                until,
            };
            cli::run_log(&repo, &args)?;
        }
        Command::Tags { prefix } => {
            let prefix = prefix.unwrap_or_else(|| config.release.tag_prefix.clone());
            cli::run_list_tags(&repo, &prefix)?;
        }
    }

    Ok(())
}
