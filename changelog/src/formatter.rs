use crate::config::ChangelogConfig;
use crate::types::ChangelogEntry;
use crate::utils::GROUP_LABEL_PATTERN;

// --- Traits ---

pub trait EntryFormatter: Send + Sync {
    fn pull_request(&self, number: u64) -> String;
    fn author(&self, name: &str) -> String;

    /// `message` or `message (#1, #2 by @a, @b)`
    fn format(&self, entry: &ChangelogEntry) -> String {
        let pull_requests = entry
            .pull_requests
            .iter()
            .map(|number| self.pull_request(*number))
            .collect::<Vec<_>>()
            .join(", ");
        let authors = entry
            .authors
            .iter()
            .map(|name| self.author(name))
            .collect::<Vec<_>>()
            .join(", ");

        match (pull_requests.is_empty(), authors.is_empty()) {
            (true, true) => entry.message.clone(),
            (false, true) => format!("{} ({pull_requests})", entry.message),
            (true, false) => format!("{} (by {authors})", entry.message),
            (false, false) => format!("{} ({pull_requests} by {authors})", entry.message),
        }
    }
}

/// References as bare `#123` / `@name`.
#[derive(Debug, Clone, Default)]
pub struct PlainEntryFormatter;

impl EntryFormatter for PlainEntryFormatter {
    fn pull_request(&self, number: u64) -> String {
        format!("#{number}")
    }

    fn author(&self, name: &str) -> String {
        format!("@{name}")
    }
}

/// References as markdown links into the repository host.
#[derive(Debug, Clone)]
pub struct LinkedEntryFormatter {
    pub host: String,
    pub repository: String,
}

impl EntryFormatter for LinkedEntryFormatter {
    fn pull_request(&self, number: u64) -> String {
        format!(
            "[#{number}](https://{}/{}/pull/{number})",
            self.host, self.repository
        )
    }

    fn author(&self, name: &str) -> String {
        format!("[@{name}](https://{}/{name})", self.host)
    }
}

#[must_use]
pub fn create_entry_formatter(config: &ChangelogConfig) -> Box<dyn EntryFormatter> {
    match &config.repository {
        Some(repository) => Box::new(LinkedEntryFormatter {
            host: config.repository_host.clone(),
            repository: repository.clone(),
        }),
        None => Box::new(PlainEntryFormatter),
    }
}

/// List item label of a group: bold inline code.
#[must_use]
pub fn group_label(group: &str) -> String {
    format!("**`{group}`**")
}

#[must_use]
pub fn parse_group_label(label: &str) -> Option<&str> {
    GROUP_LABEL_PATTERN
        .captures(label.trim())
        .and_then(|captures| captures.name("name"))
        .map(|name| name.as_str())
}
