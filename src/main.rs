use std::path::Path;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use gitlite::merge::MergeOutcome;
use gitlite::repo::Repository;
use gitlite::{merge, remote, status, telemetry};

/// Minimal content-addressed version control
///
/// gitlite tracks snapshots of the files in the current directory as
/// immutable commits on named branches. Files live in a flat top-level
/// namespace; all state is kept under .gitlite/.
///
/// TYPICAL FLOW:
///
///   gitlite init
///   gitlite add <file>
///   gitlite commit "message"
///   gitlite branch <name> / gitlite checkout <name>
///   gitlite merge <name>
///
/// Remotes are plain filesystem paths to another repository's .gitlite
/// directory; push/fetch/pull copy objects between the two stores.
#[derive(Parser)]
#[command(name = "gitlite")]
#[command(version, about)]
#[command(after_help = "See 'gitlite <command> --help' for details on a specific command.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository in the current directory
    Init,

    /// Stage a file for the next commit
    Add {
        /// File name (top-level, no directories)
        file: String,
    },

    /// Record the staged changes as a new commit
    Commit {
        /// Commit message (a single line)
        message: String,
    },

    /// Unstage a file, or stage a tracked file for deletion
    Rm {
        /// File name
        file: String,
    },

    /// Show history from the current commit, first parents only
    Log,

    /// Show every commit in the object store
    GlobalLog,

    /// Print the ids of all commits with exactly this message
    Find {
        /// Message to match
        message: String,
    },

    /// Show branches, staged changes, unstaged drift, and untracked files
    Status,

    /// Switch branches, or restore a file (use `--` before the file name)
    ///
    /// Three forms:
    ///   gitlite checkout <branch>
    ///   gitlite checkout -- <file>
    ///   gitlite checkout <commit> -- <file>
    Checkout {
        /// Branch to switch to, or a (possibly abbreviated) commit id when
        /// restoring a file
        target: Option<String>,

        /// File to restore, written after `--`
        #[arg(last = true)]
        file: Option<String>,
    },

    /// Create a branch at the current commit
    Branch {
        /// Branch name
        name: String,
    },

    /// Delete a branch ref (its commits are kept)
    RmBranch {
        /// Branch name
        name: String,
    },

    /// Move the current branch to a commit and restore its snapshot
    Reset {
        /// Commit id, possibly abbreviated
        commit: String,
    },

    /// Merge a branch into the current branch
    Merge {
        /// Branch to merge from
        branch: String,
    },

    /// Register a remote repository path
    AddRemote {
        /// Remote name
        name: String,
        /// Path to the remote repository's .gitlite directory
        path: String,
    },

    /// Remove a remote registration
    RmRemote {
        /// Remote name
        name: String,
    },

    /// Send the current branch's history to a remote branch
    Push {
        /// Remote name
        remote: String,
        /// Branch name on the remote
        branch: String,
    },

    /// Import a remote branch into refs/heads/<remote>/<branch>
    Fetch {
        /// Remote name
        remote: String,
        /// Branch name on the remote
        branch: String,
    },

    /// Fetch a remote branch and merge it into the current branch
    Pull {
        /// Remote name
        remote: String,
        /// Branch name on the remote
        branch: String,
    },
}

fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn open(root: &Path) -> Result<Repository> {
    Ok(Repository::open(root)?)
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cli.command {
        Commands::Init => {
            Repository::init(&cwd)?;
        }
        Commands::Add { file } => open(&cwd)?.add(&file)?,
        Commands::Commit { message } => {
            open(&cwd)?.commit(&message)?;
        }
        Commands::Rm { file } => open(&cwd)?.rm(&file)?,
        Commands::Log => {
            for entry in open(&cwd)?.log_entries()? {
                print!("{}", entry.render());
            }
        }
        Commands::GlobalLog => {
            for entry in open(&cwd)?.global_log_entries()? {
                print!("{}", entry.render());
            }
        }
        Commands::Find { message } => {
            for id in open(&cwd)?.find(&message)? {
                println!("{id}");
            }
        }
        Commands::Status => {
            print!("{}", status::collect(&open(&cwd)?)?.render());
        }
        Commands::Checkout { target, file } => {
            let repo = open(&cwd)?;
            match (target, file) {
                (Some(branch), None) => repo.checkout_branch(&branch)?,
                (None, Some(file)) => repo.checkout_file_from_head(&file)?,
                (Some(commit), Some(file)) => repo.checkout_file(&commit, &file)?,
                (None, None) => bail!("Incorrect operands."),
            }
        }
        Commands::Branch { name } => open(&cwd)?.branch(&name)?,
        Commands::RmBranch { name } => open(&cwd)?.rm_branch(&name)?,
        Commands::Reset { commit } => open(&cwd)?.reset(&commit)?,
        Commands::Merge { branch } => report_merge(&merge::merge(&open(&cwd)?, &branch)?),
        Commands::AddRemote { name, path } => remote::add_remote(&open(&cwd)?, &name, &path)?,
        Commands::RmRemote { name } => remote::rm_remote(&open(&cwd)?, &name)?,
        Commands::Push {
            remote: remote_name,
            branch,
        } => remote::push(&open(&cwd)?, &remote_name, &branch)?,
        Commands::Fetch {
            remote: remote_name,
            branch,
        } => remote::fetch(&open(&cwd)?, &remote_name, &branch)?,
        Commands::Pull {
            remote: remote_name,
            branch,
        } => report_merge(&remote::pull(&open(&cwd)?, &remote_name, &branch)?),
    }
    Ok(())
}

fn report_merge(outcome: &MergeOutcome) {
    if let Some(message) = outcome.message() {
        println!("{message}");
    }
}
