//! Agregación y reportes sobre submissions aprobadas.
//!
//! `metrics` y `views` son funciones puras; `Reports` sólo obtiene del store
//! las submissions `approved` (con su detalle) que esas funciones consumen.
mod metrics;
mod views;

use chrono::NaiveDate;
use esg_domain::{DetailRecord, EsgType, Submission, SubmissionDetails, SubmissionStatus};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use metrics::{fugitive_emissions, fugitive_emissions_tco2e, renewable_percentage, FugitiveEmissions,
                  FugitiveEmissionsCo2e};
pub use views::{dashboard_summary, period_series, report_table, ChartPoint, DashboardSummary, ReportRow};

use crate::errors::CoreError;
use crate::store::EsgStore;

/// Submission aprobada con nombre de sitio y sus tres registros de detalle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub submission: Submission,
    pub site_name: String,
    pub environmental: DetailRecord,
    pub social: DetailRecord,
    pub governance: DetailRecord,
}

impl ReportEntry {
    pub fn new(site_name: impl Into<String>, details: SubmissionDetails) -> Self {
        Self { site_name: site_name.into(),
               submission: details.submission,
               environmental: details.environmental,
               social: details.social,
               governance: details.governance }
    }

    /// Valor de una columna buscándola en la tabla que la declara (0 si no).
    pub fn value(&self, column: &str) -> f64 {
        match EsgType::ALL.into_iter().find(|t| t.has_column(column)) {
            Some(EsgType::Environmental) => self.environmental.get(column),
            Some(EsgType::Social) => self.social.get(column),
            Some(EsgType::Governance) => self.governance.get(column),
            None => 0.0,
        }
    }
}

/// Filtro de reportes: sitio y/o rango de fechas (periodo contenido en
/// `[from, to]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub site_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        self.site_id.map_or(true, |id| submission.site_id == id)
        && self.from.map_or(true, |from| submission.period_start >= from)
        && self.to.map_or(true, |to| submission.period_end <= to)
    }
}

/// Servicio de reportes sobre un `EsgStore`.
pub struct Reports<'s, S: EsgStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: EsgStore + ?Sized> Reports<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Submissions `approved` que cumplen el filtro, con su detalle.
    pub fn approved_entries(&self, filter: &ReportFilter) -> Result<Vec<ReportEntry>, CoreError> {
        let approved: Vec<_> = self.store
                                   .fetch_submissions()?
                                   .into_iter()
                                   .filter(|s| s.submission.status == SubmissionStatus::Approved)
                                   .filter(|s| filter.matches(&s.submission))
                                   .collect();
        let mut entries = Vec::with_capacity(approved.len());
        for summary in approved {
            let details = self.store.fetch_submission_details(summary.submission.id)?;
            entries.push(ReportEntry::new(summary.site_name, details));
        }
        debug!("approved_entries:done count={}", entries.len());
        Ok(entries)
    }

    pub fn summary(&self, filter: &ReportFilter) -> Result<DashboardSummary, CoreError> {
        Ok(dashboard_summary(&self.approved_entries(filter)?))
    }

    pub fn series(&self, filter: &ReportFilter, fields: &[&str]) -> Result<Vec<ChartPoint>, CoreError> {
        Ok(period_series(&self.approved_entries(filter)?, fields))
    }

    pub fn table(&self, filter: &ReportFilter) -> Result<Vec<ReportRow>, CoreError> {
        Ok(report_table(&self.approved_entries(filter)?))
    }
}
