//! esg-domain
//!
//! Modelo de datos del tablero ESG: sitios, catálogo de parámetros,
//! submissions con su estado de aprobación y los registros de detalle
//! (environmental / social / governance). No realiza I/O.
pub mod catalog;
pub mod columns;
pub mod error;
pub mod esg_type;
pub mod period;
pub mod site;
pub mod submission;

pub use catalog::{normalize_parameter_name, Category, NewCategory, NewParameter, Parameter};
pub use columns::{EnvironmentalColumn, GovernanceColumn, SocialColumn};
pub use error::DomainError;
pub use esg_type::EsgType;
pub use period::{period_label, ReportingPeriod};
pub use site::{NewSite, Site};
pub use submission::{DetailRecord, Submission, SubmissionDetails, SubmissionStatus, SubmissionSummary};
