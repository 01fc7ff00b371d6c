use changelog::ChangelogError;
use semver::Error as SemverError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    #[error("Changelog not found at path: {0}")]
    ChangelogNotFound(PathBuf),

    #[error("Failed to serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobError(#[from] glob::PatternError),

    #[error("Semver parse error: {0}")]
    SemverError(#[from] SemverError),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Changelog(err) => err.user_message(),
            Self::ChangelogNotFound(path) => format!("Changelog not found at: {}", path.display()),
            Self::JsonError(err) => format!("Failed to serialize JSON: {err}"),
            Self::GlobError(err) => format!("Invalid glob pattern: {err}"),
            Self::SemverError(err) => format!("Invalid semantic version: {err}"),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_unwraps_changelog_errors() {
        let err: CliError = ChangelogError::VersionNotFound {
            version: "9.9.9".to_string(),
        }
        .into();

        assert_eq!(
            err.user_message(),
            "Version '9.9.9' has no section in the changelog"
        );
    }

    #[test]
    fn test_result_ext_adds_context() {
        let result: std::result::Result<(), SemverError> =
            semver::Version::parse("next").map(|_| ());

        let err = result.with_context(|| "Invalid release version").unwrap_err();
        assert!(err.user_message().starts_with("Invalid release version: Invalid semantic version"));
    }
}
