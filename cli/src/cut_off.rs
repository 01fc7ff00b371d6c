use crate::cli::ChangelogArgs;
use crate::context;
use crate::error::{CliError, Result, ResultExt};
use crate::progress::ProgressTracker;
use crate::ui;
use semver::Version;

/// Executes the cut-off command
pub fn execute(version: String, args: ChangelogArgs) -> Result<()> {
    let version = Version::parse(&version)
        .with_context(|| format!("'{version}' is not a valid release version"))?;

    let mut progress = ProgressTracker::new("Changelog Cut-off")
        .with_steps([
            "Reading changelog",
            "Checking published versions",
            "Cutting off unpublished changes",
        ])
        .verbose(args.verbose);

    progress.start_step();
    let mut changelog = context::open(&args)?;
    let unpublished = changelog.changes(None, None);
    progress.complete_step();

    progress.start_step();
    match changelog.last_published_version() {
        Some(last) => {
            let last = Version::parse(&last)?;
            if version <= last {
                return Err(CliError::Other(format!(
                    "Version {version} must be greater than the last published version {last}"
                )));
            }
            progress.complete_step();
        }
        None => progress.skip_step("no published version yet"),
    }

    progress.start_step();
    changelog
        .cut_off(&version.to_string())
        .map_err(|e| CliError::Changelog(e).with_context("Failed to cut off changelog"))?;
    progress.complete_step();

    progress.complete();
    if unpublished.total_count == 0 {
        ui::warning_message(&format!("Version {version} does not introduce any changes"));
    } else {
        ui::info_message(&format!(
            "Released {} changes as {version}",
            unpublished.total_count
        ));
    }

    Ok(())
}
