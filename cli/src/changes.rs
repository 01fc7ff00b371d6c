use crate::cli::ChangelogArgs;
use crate::context;
use crate::error::{Result, ResultExt};
use crate::ui;
use changelog::ChangelogChanges;

/// Executes the changes command
pub fn execute(
    from: Option<String>,
    to: Option<String>,
    json: bool,
    args: ChangelogArgs,
) -> Result<()> {
    let mut changelog = context::open(&args)?;
    let changes = changelog.changes(from.as_deref(), to.as_deref());

    if json {
        let output = serde_json::to_string_pretty(&changes)
            .with_context(|| "Failed to serialize changes")?;
        println!("{output}");
        return Ok(());
    }

    print_changes(&changes);
    Ok(())
}

fn print_changes(changes: &ChangelogChanges) {
    if changes.total_count == 0 {
        ui::info_message("No changes found");
        return;
    }

    for (version, sections) in &changes.versions {
        ui::heading_message(0, version);
        for (change_type, entries) in sections.iter().filter(|(_, entries)| !entries.is_empty()) {
            ui::heading_message(1, change_type);
            for entry in entries {
                ui::entry_message(2, entry);
            }
        }
    }
    ui::info_message(&format!("{} changes in total", changes.total_count));
}
