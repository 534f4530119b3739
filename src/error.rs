use thiserror::Error;

pub type Result<T, E = PortalError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("invalid status '{0}' (expected pending, eligible or rejected)")]
    InvalidStatus(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl PortalError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for PortalError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) if is_transient_sqlstate(&code) => {
                    Self::StoreUnavailable(format!("{} ({code})", db_err.message()))
                }
                _ => Self::InvalidArgument(db_err.message().to_string()),
            },
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

/// SQLSTATE classes 08 (connection), 40 (serialization/deadlock),
/// 53 (insufficient resources) and 57 (operator intervention).
pub fn is_transient_sqlstate(code: &str) -> bool {
    matches!(code.get(..2), Some("08" | "40" | "53" | "57"))
}
