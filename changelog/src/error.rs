use thiserror::Error;

/// Errors that can occur when working with changelogs
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read or write changelog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse changelog config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Version {version} not found")]
    VersionNotFound { version: String },

    #[error("Couldn't find '{change_type}' section in version {version}")]
    ChangeTypeSectionNotFound {
        change_type: String,
        version: String,
    },

    #[error("Cannot render token of kind '{0}'")]
    UnsupportedTokenKind(String),

    #[error("Changelog tokens have not been loaded")]
    TokensNotLoaded,

    #[error("Unknown change type: {0}")]
    UnknownChangeType(String),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),
}

impl ChangelogError {
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File operation failed: {e}"),
            Self::ConfigParse(e) => format!("Invalid changelog config: {e}"),
            Self::VersionNotFound { version } => {
                format!("Version '{version}' has no section in the changelog")
            }
            Self::ChangeTypeSectionNotFound {
                change_type,
                version,
            } => format!("Version '{version}' has no '{change_type}' section"),
            Self::UnsupportedTokenKind(kind) => {
                format!("The changelog contains a '{kind}' block, which cannot be rendered")
            }
            Self::TokensNotLoaded => "Changelog must be loaded before rendering".to_string(),
            Self::UnknownChangeType(name) => format!(
                "Unknown change type '{name}' (expected breaking, feature, fix, notice, other or library)"
            ),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;
