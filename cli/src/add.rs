use crate::cli::ChangelogArgs;
use crate::context;
use crate::error::{CliError, Result};
use crate::progress::ProgressTracker;
use crate::ui;
use changelog::{Change, ChangeType, ChangelogEntry, InsertOutcome, UNPUBLISHED_VERSION_NAME};

/// Executes the add command
pub fn execute(
    change_type: String,
    message: String,
    pull_requests: Vec<u64>,
    authors: Vec<String>,
    version: Option<String>,
    group: Option<String>,
    args: ChangelogArgs,
) -> Result<()> {
    let mut progress = ProgressTracker::new("Add Changelog Entry")
        .with_steps([
            "Reading changelog",
            "Inserting entry",
            "Writing updated changelog",
        ])
        .verbose(args.verbose);

    progress.start_step();
    let mut changelog = context::open(&args)?;
    progress.complete_step();

    progress.start_step();
    let heading = resolve_change_type(&change_type);
    let entry = ChangelogEntry::new(message)
        .with_pull_requests(pull_requests)
        .with_authors(authors);
    let mut change = Change::new(&heading, entry);
    if let Some(version) = version {
        change = change.in_version(version);
    }
    if let Some(group) = group {
        change = change.in_group(group);
    }
    let target_version = change
        .version
        .clone()
        .unwrap_or_else(|| UNPUBLISHED_VERSION_NAME.to_string());

    let outcome = changelog
        .add_change(&change)
        .map_err(|e| CliError::Changelog(e).with_context("Failed to add entry"))?;
    progress.complete_step();

    match outcome {
        InsertOutcome::Inserted(_) => {
            progress.start_step();
            changelog.save()?;
            progress.complete_step();
            progress.complete();
            ui::success_message(&format!("Added entry to '{heading}' in {target_version}"));
        }
        InsertOutcome::SectionMissingInVersion => {
            progress.skip_step("nothing was inserted");
            ui::warning_message(&format!(
                "Version {target_version} has no '{heading}' section, the entry was not added"
            ));
        }
    }

    Ok(())
}

/// Short names map to the standard headings, anything else is used verbatim
fn resolve_change_type(change_type: &str) -> String {
    change_type
        .parse::<ChangeType>()
        .map_or_else(|_| change_type.trim().to_string(), |ty| ty.heading().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_change_type() {
        assert_eq!(resolve_change_type("fix"), "🐛 Bug fixes");
        assert_eq!(resolve_change_type("breaking"), "🛠 Breaking changes");
        assert_eq!(resolve_change_type("🧹 Chores"), "🧹 Chores");
    }
}
