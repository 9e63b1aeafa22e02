//! Domain error types.

/// Top-level error type for sorare-limited.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid roster entry [{position}] {slug}: {reason}")]
    RosterEntry {
        position: String,
        slug: String,
        reason: String,
    },

    #[error("roster declares no players")]
    EmptyRoster,

    #[error("request for {slug} failed: {reason}")]
    Network { slug: String, reason: String },

    #[error("unexpected response for {slug}: {reason}")]
    ResponseShape { slug: String, reason: String },

    #[error("no table at {path}")]
    MissingArtifact { path: String },

    #[error("table error in {path}: {reason}")]
    Table { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BoardError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BoardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the configuration family, which aborts before any request.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            BoardError::ConfigParse { .. }
                | BoardError::ConfigInvalid { .. }
                | BoardError::RosterEntry { .. }
                | BoardError::EmptyRoster
        )
    }
}

impl From<&BoardError> for std::process::ExitCode {
    fn from(err: &BoardError) -> Self {
        let code: u8 = match err {
            BoardError::Io(_) => 1,
            BoardError::ConfigParse { .. }
            | BoardError::ConfigInvalid { .. }
            | BoardError::RosterEntry { .. }
            | BoardError::EmptyRoster => 2,
            BoardError::Network { .. } => 3,
            BoardError::ResponseShape { .. } | BoardError::Table { .. } => 4,
            BoardError::MissingArtifact { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
