use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ChangelogConfig;
use crate::error::{ChangelogError, Result};
use crate::formatter::{create_entry_formatter, group_label, parse_group_label};
use crate::lexer::lex;
use crate::renderer::render;
use crate::store::{ChangelogStore, FsStore};
use crate::token::{ListItemToken, ListToken, Token, Tokens};
use crate::types::*;

/// Cached token tree of a changelog.
#[derive(Debug, Clone, Default)]
enum TokenState {
    #[default]
    Unloaded,
    Loaded(Tokens),
}

impl TokenState {
    fn get_or_load(&mut self, load: impl FnOnce() -> Tokens) -> &mut Tokens {
        if let Self::Unloaded = self {
            *self = Self::Loaded(load());
        }
        match self {
            Self::Loaded(tokens) => tokens,
            Self::Unloaded => unreachable!("tokens are loaded above"),
        }
    }
}

/// A changelog file and its lazily lexed token tree.
///
/// The tree is read on first access, mutated in place by the insert
/// operations and dropped after every successful save, so the next access
/// re-reads what was actually written.
#[derive(Debug)]
pub struct Changelog<S: ChangelogStore = FsStore> {
    path: PathBuf,
    store: S,
    config: ChangelogConfig,
    state: TokenState,
}

impl Changelog<FsStore> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, ChangelogConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: ChangelogConfig) -> Self {
        Self::with_store(path, config, FsStore)
    }
}

impl<S: ChangelogStore> Changelog<S> {
    pub fn with_store(path: impl Into<PathBuf>, config: ChangelogConfig, store: S) -> Self {
        Self {
            path: path.into(),
            store,
            config,
            state: TokenState::Unloaded,
        }
    }

    /// Gets the path to the changelog file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn config(&self) -> &ChangelogConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, TokenState::Loaded(_))
    }

    #[must_use]
    pub fn file_exists(&self) -> bool {
        self.store.exists(&self.path)
    }

    /// Token tree, lexed from the file on first access.
    ///
    /// A missing or unreadable file yields an empty tree.
    pub fn tokens(&mut self) -> &mut Tokens {
        let path = &self.path;
        let store = &self.store;
        self.state.get_or_load(|| {
            let tokens = match store.read(path) {
                Ok(Some(content)) => lex(&content),
                Ok(None) => Tokens::new(),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to read changelog, treating it as empty"
                    );
                    Tokens::new()
                }
            };
            debug!(path = %path.display(), tokens = tokens.len(), "loaded changelog");
            tokens
        })
    }

    /// Texts of all version headings, in document order.
    pub fn versions(&mut self) -> Vec<String> {
        self.tokens()
            .iter()
            .filter_map(Token::as_heading)
            .filter(|heading| heading.depth == VERSION_HEADING_DEPTH)
            .map(|heading| heading.text.clone())
            .collect()
    }

    /// First version heading that is a valid semantic version.
    pub fn last_published_version(&mut self) -> Option<String> {
        self.versions()
            .into_iter()
            .find(|version| semver::Version::parse(version).is_ok())
    }

    /// Collects list entries from `to_version` (the unpublished section by
    /// default) down to, but excluding, `from_version`. Without
    /// `from_version` only the first matching section is read.
    ///
    /// Versions and change types keep their document order; sections without
    /// entries are listed with no entries.
    pub fn changes(
        &mut self,
        from_version: Option<&str>,
        to_version: Option<&str>,
    ) -> ChangelogChanges {
        let to_version = canonical_version_key(to_version.unwrap_or(UNPUBLISHED_VERSION_NAME));
        let from_version = from_version.map(canonical_version_key);
        let mut changes = ChangelogChanges::default();
        let mut current_version: Option<String> = None;
        let mut current_type: Option<String> = None;

        for token in self.tokens().iter() {
            match token {
                Token::Heading(heading) if heading.depth == VERSION_HEADING_DEPTH => {
                    let version = canonical_version_key(&heading.text);
                    if version != to_version && from_version.is_none_or(|from| version == from) {
                        break;
                    }
                    changes.versions.entry(version.to_string()).or_default();
                    current_version = Some(version.to_string());
                    current_type = None;
                }
                Token::Heading(heading) if heading.depth == CHANGE_TYPE_HEADING_DEPTH => {
                    let Some(version) = &current_version else {
                        continue;
                    };
                    changes
                        .versions
                        .entry(version.clone())
                        .or_default()
                        .entry(heading.text.clone())
                        .or_default();
                    current_type = Some(heading.text.clone());
                }
                Token::List(list) => {
                    let (Some(version), Some(change_type)) = (&current_version, &current_type)
                    else {
                        continue;
                    };
                    let entries = changes
                        .versions
                        .entry(version.clone())
                        .or_default()
                        .entry(change_type.clone())
                        .or_default();
                    for item in &list.items {
                        entries.push(item.text.trim().to_string());
                        changes.total_count += 1;
                    }
                }
                _ => {}
            }
        }
        changes
    }

    /// Renders the loaded tree.
    ///
    /// # Errors
    ///
    /// [`ChangelogError::TokensNotLoaded`] before the first load, or a render error.
    pub fn render(&self) -> Result<String> {
        match &self.state {
            TokenState::Loaded(tokens) => render(tokens),
            TokenState::Unloaded => Err(ChangelogError::TokensNotLoaded),
        }
    }

    /// Writes the loaded tree back and drops the cache. No-op when nothing was loaded.
    ///
    /// # Errors
    ///
    /// Returns render errors and write failures.
    pub fn save(&mut self) -> Result<()> {
        if !self.is_loaded() {
            debug!(path = %self.path.display(), "changelog not loaded, nothing to save");
            return Ok(());
        }
        let content = self.render()?;
        self.store.write(&self.path, &content).map_err(|e| {
            ChangelogError::Io(e).with_context(format!("Failed to write {}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), bytes = content.len(), "saved changelog");
        self.state = TokenState::Unloaded;
        Ok(())
    }

    /// Inserts a single change.
    ///
    /// # Errors
    ///
    /// See [`Changelog::insert_entries`].
    pub fn add_change(&mut self, change: &Change) -> Result<InsertOutcome> {
        let version = change.version.as_deref().unwrap_or(UNPUBLISHED_VERSION_NAME);
        self.insert_entries(
            version,
            &change.change_type,
            change.group.as_deref(),
            std::slice::from_ref(&change.entry),
        )
    }

    /// Appends `entries` to the `change_type` section of `version`, inside
    /// `group` when given.
    ///
    /// Returns [`InsertOutcome::SectionMissingInVersion`] without inserting
    /// when the next version heading is reached before the section.
    ///
    /// # Errors
    ///
    /// [`ChangelogError::VersionNotFound`] when no heading reads `version`,
    /// [`ChangelogError::ChangeTypeSectionNotFound`] when the document ends
    /// before a matching section.
    pub fn insert_entries(
        &mut self,
        version: &str,
        change_type: &str,
        group: Option<&str>,
        entries: &[ChangelogEntry],
    ) -> Result<InsertOutcome> {
        let formatter = create_entry_formatter(&self.config);
        let labels: Vec<String> = entries.iter().map(|entry| formatter.format(entry)).collect();
        self.insert_labels(version, change_type, group, &labels)
    }

    /// Like [`Changelog::insert_entries`], but appends already formatted
    /// labels verbatim.
    ///
    /// # Errors
    ///
    /// See [`Changelog::insert_entries`].
    pub fn insert_labels<L: AsRef<str>>(
        &mut self,
        version: &str,
        change_type: &str,
        group: Option<&str>,
        labels: &[L],
    ) -> Result<InsertOutcome> {
        if labels.is_empty() {
            return Ok(InsertOutcome::Inserted(0));
        }
        let path = self.path.clone();
        let tokens = self.tokens();

        let version_index = tokens
            .iter()
            .position(|token| is_version_heading(token, Some(version)))
            .ok_or_else(|| ChangelogError::VersionNotFound {
                version: version.to_string(),
            })?;

        for index in version_index + 1..tokens.len() {
            if is_version_heading(&tokens[index], None) {
                warn!(
                    path = %path.display(),
                    version,
                    change_type,
                    "version has no such change type section, entries were not inserted"
                );
                return Ok(InsertOutcome::SectionMissingInVersion);
            }
            if !is_change_type_heading(&tokens[index], change_type) {
                continue;
            }

            let mut list = section_list(tokens, index);
            if let Some(group) = group {
                list = group_list(list, group);
            }
            let depth = list.depth;
            let count = labels.len();
            list.items.extend(
                labels
                    .iter()
                    .map(|label| ListItemToken::new(label.as_ref(), depth)),
            );
            debug!(path = %path.display(), version, change_type, group, count, "inserted entries");
            return Ok(InsertOutcome::Inserted(count));
        }

        Err(ChangelogError::ChangeTypeSectionNotFound {
            change_type: change_type.to_string(),
            version: version.to_string(),
        })
    }

    /// Cuts off the unpublished changes into `version` with the configured
    /// change types for the new unpublished section, and saves.
    ///
    /// # Errors
    ///
    /// Returns render errors and write failures.
    pub fn cut_off(&mut self, version: &str) -> Result<()> {
        let types = self.config.cut_off_change_types.clone();
        self.cut_off_with_types(version, &types)
    }

    /// Renames the first version section to `version`, drops its empty
    /// change-type sections, and prepends a fresh unpublished section with
    /// `types` headings. Saves immediately.
    ///
    /// # Errors
    ///
    /// Returns render errors and write failures.
    pub fn cut_off_with_types<T: AsRef<str>>(&mut self, version: &str, types: &[T]) -> Result<()> {
        let tokens = self.tokens();
        let first_version_index = tokens.iter().position(|token| is_version_heading(token, None));

        if let Some(first) = first_version_index {
            if let Token::Heading(heading) = &mut tokens[first] {
                heading.text = version.to_string();
            }
            remove_empty_sections(tokens, first);

            let section_is_empty = tokens
                .get(first + 1)
                .is_none_or(|token| is_version_heading(token, None));
            if section_is_empty {
                tokens.splice(
                    first + 1..first + 1,
                    [Token::paragraph(VERSION_EMPTY_PARAGRAPH_TEXT), Token::Space],
                );
            }
        } else {
            debug!("no version heading found, adding the unpublished section at the top");
        }

        let insert_at = first_version_index.unwrap_or(0);
        let section = std::iter::once(Token::heading(
            VERSION_HEADING_DEPTH,
            UNPUBLISHED_VERSION_NAME,
        ))
        .chain(
            types
                .iter()
                .map(|change_type| Token::heading(CHANGE_TYPE_HEADING_DEPTH, change_type.as_ref())),
        );
        tokens.splice(insert_at..insert_at, section);

        debug!(path = %self.path.display(), version, "cut off unpublished changes");
        self.save()
    }
}

/// Version heading, reading `version` when given. Any unpublished alias
/// matches any unpublished heading.
fn is_version_heading(token: &Token, version: Option<&str>) -> bool {
    token.as_heading().is_some_and(|heading| {
        heading.depth == VERSION_HEADING_DEPTH
            && version.is_none_or(|version| {
                heading.text == version
                    || (canonical_version_key(version) == UNPUBLISHED_VERSION_NAME
                        && canonical_version_key(&heading.text) == UNPUBLISHED_VERSION_NAME)
            })
    })
}

fn is_change_type_heading(token: &Token, change_type: &str) -> bool {
    token.as_heading().is_some_and(|heading| {
        heading.depth == CHANGE_TYPE_HEADING_DEPTH && heading.text == change_type
    })
}

/// Removes change-type headings of the section at `version_index` that are
/// directly followed by another heading or by the end of the document.
fn remove_empty_sections(tokens: &mut Tokens, version_index: usize) {
    let mut index = version_index + 1;
    while index < tokens.len() {
        let token = &tokens[index];
        if is_version_heading(token, None) {
            break;
        }
        if !token.is_heading_of_depth(CHANGE_TYPE_HEADING_DEPTH) {
            index += 1;
            continue;
        }
        let next_content = tokens[index + 1..]
            .iter()
            .position(|token| !matches!(token, Token::Space))
            .map(|offset| index + 1 + offset);
        let is_empty = next_content.is_none_or(|next| tokens[next].is_heading());
        if is_empty {
            let end = next_content.unwrap_or(tokens.len());
            tokens.drain(index..end);
        } else {
            index += 1;
        }
    }
}

/// The list of the change-type section starting at `heading_index`, spliced
/// in before the section's end when missing.
fn section_list(tokens: &mut Tokens, heading_index: usize) -> &mut ListToken {
    let mut index = heading_index + 1;
    let mut found = false;
    while index < tokens.len() {
        match &tokens[index] {
            Token::Heading(heading) if heading.depth <= CHANGE_TYPE_HEADING_DEPTH => break,
            Token::List(_) => {
                found = true;
                break;
            }
            _ => index += 1,
        }
    }
    if !found {
        tokens.insert(index, Token::List(ListToken::new(0)));
    }
    match &mut tokens[index] {
        Token::List(list) => list,
        other => unreachable!("expected a list token, found {}", other.kind()),
    }
}

/// Sub-list of the `group` item in `list`, creating the item when missing.
fn group_list<'a>(list: &'a mut ListToken, group: &str) -> &'a mut ListToken {
    let index = match list.items.iter().position(|item| {
        item.first_text()
            .and_then(parse_group_label)
            .is_some_and(|name| name == group)
    }) {
        Some(index) => index,
        None => {
            list.items
                .push(ListItemToken::new(group_label(group), list.depth));
            list.items.len() - 1
        }
    };
    list.items[index].sub_list_mut()
}
