//! Errores de persistencia.
//! Mapea errores de Diesel / conexión a variantes semánticas y éstas a
//! `CoreError` en la frontera del `EsgStore`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use esg_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not found")]
    NotFound,
    #[error("serialization conflict")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                DatabaseErrorKind::ClosedConnection => Self::TransientIo(info.message().to_string()),
                other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
            },
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::RollbackErrorOnCommit { rollback_error, commit_error } => {
                Self::Unknown(format!("rollback={rollback_error}; commit={commit_error}"))
            }
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl PersistenceError {
    /// Clasifica `err` y antepone la tabla afectada al mensaje.
    pub fn in_table(err: DieselError, table: &str) -> Self {
        match Self::from(err) {
            Self::UniqueViolation(m) => Self::UniqueViolation(format!("{table}: {m}")),
            Self::CheckViolation(m) => Self::CheckViolation(format!("{table}: {m}")),
            Self::ForeignKeyViolation(m) => Self::ForeignKeyViolation(format!("{table}: {m}")),
            Self::TransientIo(m) => Self::TransientIo(format!("{table}: {m}")),
            Self::Unknown(m) => Self::Unknown(format!("{table}: {m}")),
            Self::NotFound => Self::Unknown(format!("{table}: row not found")),
            Self::SerializationConflict => Self::Unknown(format!("{table}: serialization conflict")),
            Self::Config(m) => Self::Config(m),
        }
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound => CoreError::NotFound("row not found".into()),
            PersistenceError::UniqueViolation(m) | PersistenceError::ForeignKeyViolation(m) => CoreError::Conflict(m),
            PersistenceError::CheckViolation(m) => CoreError::Validation(m),
            other => CoreError::Storage(other.to_string()),
        }
    }
}
