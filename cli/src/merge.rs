use crate::cli::ChangelogArgs;
use crate::context;
use crate::error::{CliError, Result, ResultExt};
use crate::progress::ProgressTracker;
use crate::ui;
use changelog::{merge_changelogs, Changelog, PackageChangelog};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Executes the merge command
pub fn execute(into: Option<PathBuf>, patterns: Vec<String>, args: ChangelogArgs) -> Result<()> {
    let target_path = into.unwrap_or_else(|| args.file.clone());

    let mut progress = ProgressTracker::new("Changelog Merge")
        .with_steps([
            "Finding package changelogs",
            "Reading target changelog",
            "Merging unpublished changes",
        ])
        .verbose(args.verbose);

    progress.start_step();
    let paths = find_changelogs(&patterns, &target_path)?;
    if paths.is_empty() {
        progress.skip_step("no changelogs matched");
        ui::warning_message("No package changelogs matched the given patterns");
        return Ok(());
    }
    progress.complete_step();

    progress.start_step();
    let config = context::load_config(&args)?;
    let mut target = context::open_changelog(&target_path, config.clone())?;
    let mut packages = paths
        .into_iter()
        .map(|path| {
            let name = package_name(&path)?;
            Ok(PackageChangelog::new(
                name,
                Changelog::with_config(path, config.clone()),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    progress.complete_step();

    progress.start_step();
    let summary = merge_changelogs(&mut target, &mut packages)
        .map_err(|e| CliError::Changelog(e).with_context("Failed to merge changelogs"))?;
    progress.complete_step();

    progress.complete();
    if summary.merged_packages.is_empty() {
        ui::info_message("No unpublished changes to merge");
    } else {
        ui::success_message(&format!(
            "Merged {} entries from {} packages into {}",
            summary.inserted_entries,
            summary.merged_packages.len(),
            target_path.display()
        ));
    }
    if summary.skipped_sections > 0 {
        ui::warning_message(&format!(
            "{} sections were skipped because the target has no matching change type",
            summary.skipped_sections
        ));
    }

    Ok(())
}

/// Expands `patterns` into existing changelog files, excluding `target`
fn find_changelogs(patterns: &[String], target: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries =
            glob::glob(pattern).with_context(|| format!("Invalid pattern '{pattern}'"))?;
        for entry in entries {
            let path = entry.map_err(|e| CliError::Io(e.into_error()))?;
            if path.is_file() && path != target {
                debug!(path = %path.display(), "found package changelog");
                paths.push(path);
            }
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Name of the directory holding the changelog
fn package_name(path: &Path) -> Result<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CliError::Other(format!(
                "Cannot derive a package name from {}",
                path.display()
            ))
        })
}
