//! Contrato del store relacional (sitios, catálogo, submissions y detalle).
//!
//! Cada operación es una llamada independiente que se resuelve o falla por
//! sí sola; no hay reintentos. La única operación multi-fila es
//! `create_submission`, que las implementaciones deben aplicar de forma
//! atómica (cabecera + tres filas de detalle, o nada).
use esg_domain::{Category, DetailRecord, EsgType, NewCategory, NewParameter, NewSite, Parameter, ReportingPeriod, Site,
                 Submission, SubmissionDetails, SubmissionStatus, SubmissionSummary};
use uuid::Uuid;

use crate::errors::CoreError;

/// Datos para crear una submission junto con sus tres filas de detalle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub site_id: Uuid,
    pub period: ReportingPeriod,
    pub submitted_by: String,
    pub status: SubmissionStatus,
    pub environmental: DetailRecord,
    pub social: DetailRecord,
    pub governance: DetailRecord,
}

impl NewSubmission {
    pub fn payload(&self, esg_type: EsgType) -> &DetailRecord {
        match esg_type {
            EsgType::Environmental => &self.environmental,
            EsgType::Social => &self.social,
            EsgType::Governance => &self.governance,
        }
    }

    /// Valida la submission antes de cualquier escritura.
    ///
    /// - `submitted_by` no vacío.
    /// - Estado inicial `draft` o `pending`.
    /// - Cada clave del payload existe como columna de su tabla de detalle.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.submitted_by.trim().is_empty() {
            return Err(CoreError::Validation("submitted_by is required".into()));
        }
        if !matches!(self.status, SubmissionStatus::Draft | SubmissionStatus::Pending) {
            return Err(CoreError::Validation(format!("initial status must be draft or pending, got {}", self.status)));
        }
        for esg_type in EsgType::ALL {
            if let Some(column) = self.payload(esg_type).columns().find(|c| !esg_type.has_column(c)) {
                return Err(CoreError::UnknownColumn { esg_type, column: column.to_string() });
            }
        }
        Ok(())
    }
}

/// Store relacional del tablero ESG.
pub trait EsgStore {
    fn list_sites(&self) -> Result<Vec<Site>, CoreError>;
    fn find_site(&self, id: Uuid) -> Result<Option<Site>, CoreError>;
    fn insert_site(&self, site: NewSite) -> Result<Site, CoreError>;
    /// Falla con `CoreError::Conflict` si alguna submission referencia el sitio.
    fn delete_site(&self, id: Uuid) -> Result<(), CoreError>;

    /// Categorías ordenadas por nombre, opcionalmente filtradas por tipo.
    fn list_categories(&self, esg_type: Option<EsgType>) -> Result<Vec<Category>, CoreError>;
    fn find_category(&self, id: Uuid) -> Result<Option<Category>, CoreError>;
    fn insert_category(&self, category: NewCategory) -> Result<Category, CoreError>;
    /// Elimina la categoría y sus parámetros.
    fn delete_category(&self, id: Uuid) -> Result<(), CoreError>;

    /// Parámetros ordenados por nombre, opcionalmente de una sola categoría.
    fn list_parameters(&self, category_id: Option<Uuid>) -> Result<Vec<Parameter>, CoreError>;
    fn insert_parameter(&self, parameter: NewParameter) -> Result<Parameter, CoreError>;
    fn delete_parameter(&self, id: Uuid) -> Result<(), CoreError>;

    /// Inserta cabecera + detalle en una única transacción y devuelve el id.
    fn create_submission(&self, submission: NewSubmission) -> Result<Uuid, CoreError>;
    /// Submissions con nombre de sitio, la actualizada más recientemente primero.
    fn fetch_submissions(&self) -> Result<Vec<SubmissionSummary>, CoreError>;
    fn find_submission(&self, id: Uuid) -> Result<Option<Submission>, CoreError>;
    /// Cabecera + detalle. Una fila de detalle ausente se devuelve vacía.
    fn fetch_submission_details(&self, id: Uuid) -> Result<SubmissionDetails, CoreError>;
    /// Actualiza estado, revisor y comentario; `reviewed_at` se fija en cada llamada.
    fn update_status(&self,
                     id: Uuid,
                     status: SubmissionStatus,
                     reviewer: &str,
                     comment: Option<&str>)
                     -> Result<Submission, CoreError>;
}
