#![forbid(unsafe_code)]

use rl_core::ConfigError;
use rusqlite::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(rusqlite::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("record not found (table={table}, id={id})")]
    NotFound { table: String, id: i64 },
    #[error("record has not been inserted yet")]
    Unpersisted,
    /// Another writer held the lock past the busy timeout. Safe to retry.
    #[error("write conflict: {source}")]
    Conflict {
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::Config(_) => "INVALID_CONFIG",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unpersisted => "UNPERSISTED",
            Self::Conflict { .. } => "CONFLICT",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub(crate) fn not_found(table: &str, id: i64) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_lock_contention(&value) {
            return Self::Conflict { source: value };
        }
        Self::Sql(value)
    }
}

fn is_lock_contention(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, _) => {
            matches!(
                code.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            )
        }
        _ => false,
    }
}
