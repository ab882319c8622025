//! esg-core: catálogo, mapeo de formularios, ciclo de aprobación y reportes
//! del tablero ESG sobre un store relacional abstracto.
pub mod aggregation;
pub mod catalog;
pub mod constants;
pub mod errors;
pub mod lifecycle;
pub mod mapper;
pub mod store;
pub mod users;

pub use aggregation::{ReportEntry, ReportFilter, Reports};
pub use catalog::{CatalogStructure, CategoryEntry, ParameterCatalog};
pub use errors::CoreError;
pub use lifecycle::{next_status, ReviewAction, SubmissionIntent, SubmissionLifecycle, SubmissionRequest};
pub use mapper::{form_values, map_form, FormInput, FormValue, MappedPayload};
pub use store::{EsgStore, InMemoryEsgStore, NewSubmission};
pub use users::{InMemoryUserRepository, User, UserRepository, UserRole};
