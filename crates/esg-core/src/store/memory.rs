use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use esg_domain::{Category, DetailRecord, EsgType, NewCategory, NewParameter, NewSite, Parameter, Site, Submission,
                 SubmissionDetails, SubmissionStatus, SubmissionSummary};
use log::debug;
use uuid::Uuid;

use super::types::{EsgStore, NewSubmission};
use crate::errors::CoreError;

/// Store en memoria con la misma semántica que el backend Postgres.
///
/// Útil para tests y prototipos. `create_submission` valida todo antes de
/// tomar el lock de escritura, por lo que nunca deja filas parciales.
#[derive(Default)]
pub struct InMemoryEsgStore {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    sites: Vec<Site>,
    categories: Vec<Category>,
    parameters: Vec<Parameter>,
    submissions: Vec<Submission>,
    details: HashMap<(Uuid, EsgType), DetailRecord>,
    // desempate de updated_at (orden de modificación)
    revisions: HashMap<Uuid, u64>,
    clock: u64,
}

impl MemoryState {
    fn touch(&mut self, id: Uuid) {
        self.clock += 1;
        self.revisions.insert(id, self.clock);
    }

    fn site_name(&self, id: Uuid) -> String {
        self.sites.iter().find(|s| s.id == id).map(|s| s.name.clone()).unwrap_or_default()
    }
}

impl InMemoryEsgStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elimina una fila de detalle. Permite simular datos heredados
    /// donde falta alguna de las tres filas.
    pub fn remove_detail_row(&self, submission_id: Uuid, esg_type: EsgType) -> Result<Option<DetailRecord>, CoreError> {
        Ok(self.write()?.details.remove(&(submission_id, esg_type)))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, CoreError> {
        self.inner.read().map_err(|_| CoreError::Storage("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, CoreError> {
        self.inner.write().map_err(|_| CoreError::Storage("in-memory store lock poisoned".into()))
    }
}

impl EsgStore for InMemoryEsgStore {
    fn list_sites(&self) -> Result<Vec<Site>, CoreError> {
        let mut sites = self.read()?.sites.clone();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }

    fn find_site(&self, id: Uuid) -> Result<Option<Site>, CoreError> {
        Ok(self.read()?.sites.iter().find(|s| s.id == id).cloned())
    }

    fn insert_site(&self, site: NewSite) -> Result<Site, CoreError> {
        let site = Site { id: Uuid::new_v4(),
                          name: site.name,
                          location: site.location,
                          site_type: site.site_type };
        self.write()?.sites.push(site.clone());
        Ok(site)
    }

    fn delete_site(&self, id: Uuid) -> Result<(), CoreError> {
        let mut state = self.write()?;
        if state.submissions.iter().any(|s| s.site_id == id) {
            return Err(CoreError::Conflict(format!("site {id} is referenced by submissions")));
        }
        let before = state.sites.len();
        state.sites.retain(|s| s.id != id);
        if state.sites.len() == before {
            return Err(CoreError::NotFound(format!("site {id}")));
        }
        Ok(())
    }

    fn list_categories(&self, esg_type: Option<EsgType>) -> Result<Vec<Category>, CoreError> {
        let mut categories: Vec<Category> = self.read()?
                                                .categories
                                                .iter()
                                                .filter(|c| esg_type.map_or(true, |t| c.esg_type == t))
                                                .cloned()
                                                .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn find_category(&self, id: Uuid) -> Result<Option<Category>, CoreError> {
        Ok(self.read()?.categories.iter().find(|c| c.id == id).cloned())
    }

    fn insert_category(&self, category: NewCategory) -> Result<Category, CoreError> {
        let mut state = self.write()?;
        // UNIQUE (esg_type, name)
        if state.categories.iter().any(|c| c.esg_type == category.esg_type && c.name == category.name) {
            return Err(CoreError::Conflict(format!("category '{}' already exists in {}",
                                                   category.name, category.esg_type)));
        }
        let category = Category { id: Uuid::new_v4(),
                                  name: category.name,
                                  esg_type: category.esg_type };
        state.categories.push(category.clone());
        Ok(category)
    }

    fn delete_category(&self, id: Uuid) -> Result<(), CoreError> {
        let mut state = self.write()?;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Err(CoreError::NotFound(format!("category {id}")));
        }
        state.parameters.retain(|p| p.category_id != id);
        Ok(())
    }

    fn list_parameters(&self, category_id: Option<Uuid>) -> Result<Vec<Parameter>, CoreError> {
        let mut parameters: Vec<Parameter> = self.read()?
                                                 .parameters
                                                 .iter()
                                                 .filter(|p| category_id.map_or(true, |c| p.category_id == c))
                                                 .cloned()
                                                 .collect();
        parameters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parameters)
    }

    fn insert_parameter(&self, parameter: NewParameter) -> Result<Parameter, CoreError> {
        let mut state = self.write()?;
        if !state.categories.iter().any(|c| c.id == parameter.category_id) {
            return Err(CoreError::Conflict(format!("category {} does not exist", parameter.category_id)));
        }
        let parameter = Parameter { id: Uuid::new_v4(),
                                    name: parameter.name,
                                    unit: parameter.unit,
                                    category_id: parameter.category_id };
        state.parameters.push(parameter.clone());
        Ok(parameter)
    }

    fn delete_parameter(&self, id: Uuid) -> Result<(), CoreError> {
        let mut state = self.write()?;
        let before = state.parameters.len();
        state.parameters.retain(|p| p.id != id);
        if state.parameters.len() == before {
            return Err(CoreError::NotFound(format!("parameter {id}")));
        }
        Ok(())
    }

    fn create_submission(&self, submission: NewSubmission) -> Result<Uuid, CoreError> {
        submission.validate()?;
        let mut state = self.write()?;
        if !state.sites.iter().any(|s| s.id == submission.site_id) {
            return Err(CoreError::Validation(format!("site {} does not exist", submission.site_id)));
        }
        let id = Uuid::new_v4();
        let now = Utc::now();
        state.submissions.push(Submission { id,
                                            site_id: submission.site_id,
                                            period_start: submission.period.start(),
                                            period_end: submission.period.end(),
                                            status: submission.status,
                                            submitted_by: submission.submitted_by,
                                            reviewer: None,
                                            review_comment: None,
                                            submitted_at: now,
                                            reviewed_at: None,
                                            updated_at: now });
        state.details.insert((id, EsgType::Environmental), submission.environmental);
        state.details.insert((id, EsgType::Social), submission.social);
        state.details.insert((id, EsgType::Governance), submission.governance);
        state.touch(id);
        debug!("create_submission:done id={id}");
        Ok(id)
    }

    fn fetch_submissions(&self) -> Result<Vec<SubmissionSummary>, CoreError> {
        let state = self.read()?;
        let mut rows: Vec<(u64, SubmissionSummary)> =
            state.submissions
                 .iter()
                 .map(|s| {
                     let rev = state.revisions.get(&s.id).copied().unwrap_or(0);
                     (rev, SubmissionSummary { submission: s.clone(), site_name: state.site_name(s.site_id) })
                 })
                 .collect();
        rows.sort_by(|(ra, a), (rb, b)| {
                b.submission.updated_at.cmp(&a.submission.updated_at).then(rb.cmp(ra))
            });
        Ok(rows.into_iter().map(|(_, s)| s).collect())
    }

    fn find_submission(&self, id: Uuid) -> Result<Option<Submission>, CoreError> {
        Ok(self.read()?.submissions.iter().find(|s| s.id == id).cloned())
    }

    fn fetch_submission_details(&self, id: Uuid) -> Result<SubmissionDetails, CoreError> {
        let state = self.read()?;
        let submission = state.submissions
                              .iter()
                              .find(|s| s.id == id)
                              .cloned()
                              .ok_or_else(|| CoreError::NotFound(format!("submission {id}")))?;
        let record = |t: EsgType| state.details.get(&(id, t)).cloned().unwrap_or_default();
        Ok(SubmissionDetails { environmental: record(EsgType::Environmental),
                               social: record(EsgType::Social),
                               governance: record(EsgType::Governance),
                               submission })
    }

    fn update_status(&self,
                     id: Uuid,
                     status: SubmissionStatus,
                     reviewer: &str,
                     comment: Option<&str>)
                     -> Result<Submission, CoreError> {
        let mut state = self.write()?;
        let now = Utc::now();
        let submission = state.submissions
                              .iter_mut()
                              .find(|s| s.id == id)
                              .ok_or_else(|| CoreError::NotFound(format!("submission {id}")))?;
        submission.status = status;
        submission.reviewer = Some(reviewer.to_string());
        submission.review_comment = comment.map(str::to_string);
        submission.reviewed_at = Some(now);
        submission.updated_at = now;
        let updated = submission.clone();
        state.touch(id);
        Ok(updated)
    }
}
