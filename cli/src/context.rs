use crate::cli::ChangelogArgs;
use crate::error::{CliError, Result};
use changelog::{Changelog, ChangelogConfig};
use std::path::Path;
use tracing::debug;

/// Loads the configuration named by `args`, defaults when the file is missing
pub fn load_config(args: &ChangelogArgs) -> Result<ChangelogConfig> {
    let config = ChangelogConfig::load_or_default(&args.config)?;
    debug!(config = %args.config.display(), ?config, "loaded configuration");
    Ok(config)
}

/// Opens an existing changelog at `path`
pub fn open_changelog(path: &Path, config: ChangelogConfig) -> Result<Changelog> {
    let changelog = Changelog::with_config(path, config);
    if !changelog.file_exists() {
        return Err(CliError::ChangelogNotFound(path.to_path_buf()));
    }
    Ok(changelog)
}

/// Opens the changelog named by `args` with its configuration
pub fn open(args: &ChangelogArgs) -> Result<Changelog> {
    let config = load_config(args)?;
    open_changelog(&args.file, config)
}
