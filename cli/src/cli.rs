use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chlog")]
#[command(
    author,
    version,
    about = "Edit package changelogs: add entries, cut off releases, merge changelogs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Clone, Debug)]
pub struct ChangelogArgs {
    /// Changelog file to operate on
    #[clap(short, long, default_value = "CHANGELOG.md")]
    pub file: PathBuf,

    /// Changelog configuration file (used when it exists)
    #[clap(short, long, default_value = ".changelog.toml")]
    pub config: PathBuf,

    /// Enable verbose output with additional information
    #[clap(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the versions found in the changelog, newest first
    Versions {
        #[clap(flatten)]
        args: ChangelogArgs,
    },

    /// Show changes of the unpublished section or of a range of versions
    Changes {
        /// Collect changes down to (but excluding) this version
        #[clap(long)]
        from: Option<String>,

        /// Version to start collecting from (defaults to the unpublished section)
        #[clap(long)]
        to: Option<String>,

        /// Print the changes as JSON
        #[clap(long, default_value_t = false)]
        json: bool,

        #[clap(flatten)]
        args: ChangelogArgs,
    },

    /// Add an entry to the changelog
    Add {
        /// Change type: breaking, feature, fix, notice, other, library or a heading text
        #[clap(short = 't', long = "type")]
        change_type: String,

        /// Entry message
        #[clap(short, long)]
        message: String,

        /// Pull request number (repeatable)
        #[clap(long = "pr")]
        pull_requests: Vec<u64>,

        /// Author user name (repeatable)
        #[clap(short, long = "author")]
        authors: Vec<String>,

        /// Version section to add to (defaults to the unpublished section)
        #[clap(long)]
        version: Option<String>,

        /// Group the entry under this name
        #[clap(short, long)]
        group: Option<String>,

        #[clap(flatten)]
        args: ChangelogArgs,
    },

    /// Turn the unpublished section into a released version
    CutOff {
        /// Version of the release (semver)
        version: String,

        #[clap(flatten)]
        args: ChangelogArgs,
    },

    /// Merge unpublished changes of package changelogs into one changelog
    Merge {
        /// Changelog receiving the entries (defaults to --file)
        #[clap(long)]
        into: Option<PathBuf>,

        /// Glob patterns matching package changelogs
        #[clap(required = true)]
        patterns: Vec<String>,

        #[clap(flatten)]
        args: ChangelogArgs,
    },
}

impl Commands {
    pub fn args(&self) -> &ChangelogArgs {
        match self {
            Self::Versions { args }
            | Self::Changes { args, .. }
            | Self::Add { args, .. }
            | Self::CutOff { args, .. }
            | Self::Merge { args, .. } => args,
        }
    }

    pub fn verbose(&self) -> bool {
        self.args().verbose
    }
}
