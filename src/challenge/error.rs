//! Challenge parsing errors

/// Errors raised while restoring challenges or randomizer presets
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("{challenge}: expected {expected} fields, found {found}")]
    FieldCount {
        challenge: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{challenge}: invalid number in field {field}: '{value}'")]
    InvalidNumber {
        challenge: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{challenge}: invalid setting: {reason}")]
    InvalidSetting {
        challenge: &'static str,
        reason: String,
    },
    #[error("Unknown challenge type: {0}")]
    UnknownChallenge(String),
    #[error("{randomizer}: missing field '{label}'")]
    MissingLabel {
        randomizer: String,
        label: &'static str,
    },
    #[error("Invalid randomizer: {0}")]
    InvalidRandomizer(String),
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result alias for challenge operations
pub type Result<T> = std::result::Result<T, ChallengeError>;
