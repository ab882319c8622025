use thiserror::Error;

/// Error del dominio ESG (validaciones puras, sin I/O).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    ValidationError(String),

    #[error("Valor desconocido para {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
