use crate::cli::ChangelogArgs;
use crate::context;
use crate::error::Result;
use crate::ui;
use changelog::{canonical_version_key, UNPUBLISHED_VERSION_NAME};

/// Executes the versions command
pub fn execute(args: ChangelogArgs) -> Result<()> {
    let mut changelog = context::open(&args)?;
    let versions = changelog.versions();

    if versions.is_empty() {
        ui::warning_message(&format!(
            "No version sections found in {}",
            args.file.display()
        ));
        return Ok(());
    }

    for version in &versions {
        if canonical_version_key(version) == UNPUBLISHED_VERSION_NAME {
            println!("{version} (unpublished)");
        } else {
            println!("{version}");
        }
    }

    match changelog.last_published_version() {
        Some(version) => ui::info_message(&format!("Last published version: {version}")),
        None => ui::info_message("No published version yet"),
    }
    if args.verbose {
        ui::info_message(&format!("{} version sections", versions.len()));
    }

    Ok(())
}
