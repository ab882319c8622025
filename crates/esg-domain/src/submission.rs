use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, EsgType, ReportingPeriod};

/// Estado de aprobación de una submission.
///
/// Transiciones válidas (ver `esg-core::lifecycle`):
/// - `Pending` -> `Approved`
/// - `Pending` -> `Rejected`
///
/// `Draft` es un estado inicial sin salidas; `Approved` y `Rejected` son
/// terminales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SubmissionStatus::Draft),
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(DomainError::UnknownValue { kind: "status", value: other.to_string() }),
        }
    }
}

/// Cabecera de una submission: las métricas de un sitio para un periodo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub site_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: SubmissionStatus,
    pub submitted_by: String,
    pub reviewer: Option<String>,
    pub review_comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    pub fn period(&self) -> Result<ReportingPeriod, DomainError> {
        ReportingPeriod::new(self.period_start, self.period_end)
    }
}

/// Submission unida con el nombre de su sitio (listados y aprobaciones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    #[serde(flatten)]
    pub submission: Submission,
    pub site_name: String,
}

/// Registro plano de una tabla de detalle: nombre de columna -> valor.
///
/// Las columnas ausentes valen 0 al leerse con `get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailRecord(BTreeMap<String, f64>);

impl DetailRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o sobrescribe; devuelve el valor previo si existía.
    pub fn insert(&mut self, column: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(column.into(), value)
    }

    /// Valor de la columna, 0 si no está presente.
    pub fn get(&self, column: &str) -> f64 {
        self.0.get(column).copied().unwrap_or(0.0)
    }

    /// Valor de la columna tal como está almacenado (None si ausente).
    pub fn value(&self, column: &str) -> Option<f64> {
        self.0.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for DetailRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Submission completa con sus tres registros de detalle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetails {
    pub submission: Submission,
    pub environmental: DetailRecord,
    pub social: DetailRecord,
    pub governance: DetailRecord,
}

impl SubmissionDetails {
    pub fn record(&self, esg_type: EsgType) -> &DetailRecord {
        match esg_type {
            EsgType::Environmental => &self.environmental,
            EsgType::Social => &self.social,
            EsgType::Governance => &self.governance,
        }
    }
}
