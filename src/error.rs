use thiserror::Error;

/// Failures surfaced by the announcement lifecycle service.
///
/// Every variant corresponds to one caller-visible outcome; collaborator
/// errors (database, directory) collapse into [`AnnouncementError::Storage`]
/// so adapters map their failures into predictable variants instead of
/// leaking backend-specific types.
#[derive(Debug, Error)]
pub enum AnnouncementError {
    /// The supplied identity is not a known teacher.
    #[error("Invalid teacher credentials")]
    Unauthorized,

    /// Malformed date, date-ordering violation, or malformed identifier.
    #[error("{0}")]
    InvalidInput(String),

    /// Identifier was well-formed but matched no record.
    #[error("Announcement not found")]
    NotFound,

    /// The persistence collaborator could not confirm the requested effect.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl AnnouncementError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<sqlx::Error> for AnnouncementError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
