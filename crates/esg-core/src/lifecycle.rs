//! Ciclo de vida de una submission.
//!
//! Máquina de estados:
//! - creación: `draft` (guardar borrador) o `pending` (enviar a aprobación)
//! - `pending` -> `approved` (revisor; limpia el comentario)
//! - `pending` -> `rejected` (revisor; comentario obligatorio)
//!
//! Cualquier otra transición es `CoreError::InvalidTransition`. Los borradores
//! no tienen salida: no se reanudan ni se editan.
use esg_domain::{ReportingPeriod, Submission, SubmissionDetails, SubmissionStatus, SubmissionSummary};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ParameterCatalog;
use crate::errors::CoreError;
use crate::mapper::{map_form, FormInput, MappedPayload};
use crate::store::{EsgStore, NewSubmission};

/// Intención al guardar el formulario; determina el estado inicial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionIntent {
    SaveDraft,
    SubmitForApproval,
}

impl SubmissionIntent {
    pub fn initial_status(&self) -> SubmissionStatus {
        match self {
            SubmissionIntent::SaveDraft => SubmissionStatus::Draft,
            SubmissionIntent::SubmitForApproval => SubmissionStatus::Pending,
        }
    }
}

/// Acción de un revisor sobre una submission pendiente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject { comment: String },
}

impl ReviewAction {
    pub fn target(&self) -> SubmissionStatus {
        match self {
            ReviewAction::Approve => SubmissionStatus::Approved,
            ReviewAction::Reject { .. } => SubmissionStatus::Rejected,
        }
    }

    /// Comentario a persistir. Aprobar lo limpia.
    pub fn comment(&self) -> Option<&str> {
        match self {
            ReviewAction::Approve => None,
            ReviewAction::Reject { comment } => Some(comment.trim()),
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        match self {
            ReviewAction::Reject { comment } if comment.trim().is_empty() => {
                Err(CoreError::Validation("a rejection reason is required".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Transición de estado. Sólo `pending` puede avanzar.
pub fn next_status(current: SubmissionStatus, action: &ReviewAction) -> Result<SubmissionStatus, CoreError> {
    let target = action.target();
    match current {
        SubmissionStatus::Pending => Ok(target),
        from => Err(CoreError::InvalidTransition { from, to: target }),
    }
}

/// Cabecera del formulario: sitio, periodo, autor e intención.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub site_id: Uuid,
    pub period: ReportingPeriod,
    pub submitted_by: String,
    pub intent: SubmissionIntent,
}

/// Controlador del ciclo de vida sobre un `EsgStore`.
pub struct SubmissionLifecycle<'s, S: EsgStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: EsgStore + ?Sized> SubmissionLifecycle<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Crea la submission con un payload ya mapeado.
    pub fn submit(&self, request: &SubmissionRequest, payload: MappedPayload) -> Result<Uuid, CoreError> {
        if self.store.find_site(request.site_id)?.is_none() {
            return Err(CoreError::Validation(format!("site {} does not exist", request.site_id)));
        }
        let new = NewSubmission { site_id: request.site_id,
                                  period: request.period,
                                  submitted_by: request.submitted_by.trim().to_string(),
                                  status: request.intent.initial_status(),
                                  environmental: payload.environmental,
                                  social: payload.social,
                                  governance: payload.governance };
        new.validate()?;
        let id = self.store.create_submission(new)?;
        info!("submission creada id={} site={} periodo={} estado={}",
              id,
              request.site_id,
              request.period.label(),
              request.intent.initial_status());
        Ok(id)
    }

    /// Catálogo -> mapeo del formulario -> creación.
    pub fn submit_form(&self, request: &SubmissionRequest, form: &FormInput) -> Result<Uuid, CoreError> {
        let structure = ParameterCatalog::new(self.store).build_structure()?;
        if !structure.is_loaded() {
            return Err(CoreError::Validation("parameter catalog is empty".into()));
        }
        let payload = map_form(&structure, form);
        self.submit(request, payload)
    }

    /// Aplica una acción de revisión validando la transición antes de escribir.
    pub fn review(&self, id: Uuid, reviewer: &str, action: ReviewAction) -> Result<Submission, CoreError> {
        let reviewer = reviewer.trim();
        if reviewer.is_empty() {
            return Err(CoreError::Validation("reviewer is required".into()));
        }
        action.validate()?;
        let current = self.store
                          .find_submission(id)?
                          .ok_or_else(|| CoreError::NotFound(format!("submission {id}")))?;
        let status = next_status(current.status, &action)?;
        debug!("review id={id} {} -> {} reviewer={reviewer}", current.status, status);
        let updated = self.store.update_status(id, status, reviewer, action.comment())?;
        info!("submission {} {} por {}", id, updated.status, reviewer);
        Ok(updated)
    }

    pub fn approve(&self, id: Uuid, reviewer: &str) -> Result<Submission, CoreError> {
        self.review(id, reviewer, ReviewAction::Approve)
    }

    pub fn reject(&self, id: Uuid, reviewer: &str, comment: &str) -> Result<Submission, CoreError> {
        self.review(id, reviewer, ReviewAction::Reject { comment: comment.to_string() })
    }

    pub fn list(&self) -> Result<Vec<SubmissionSummary>, CoreError> {
        self.store.fetch_submissions()
    }

    /// Cola de aprobación: submissions en `pending`.
    pub fn pending(&self) -> Result<Vec<SubmissionSummary>, CoreError> {
        Ok(self.list()?
               .into_iter()
               .filter(|s| s.submission.status == SubmissionStatus::Pending)
               .collect())
    }

    pub fn details(&self, id: Uuid) -> Result<SubmissionDetails, CoreError> {
        self.store.fetch_submission_details(id)
    }
}
