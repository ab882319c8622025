//! Vistas para el tablero y los reportes. Reordenan datos ya obtenidos;
//! no interpolan ni rellenan periodos faltantes.
use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use esg_domain::{period_label, DetailRecord, EnvironmentalColumn, SocialColumn};
use indexmap::IndexMap;
use serde::Serialize;

use super::metrics::{fugitive_emissions, fugitive_emissions_tco2e, renewable_percentage, FugitiveEmissions};
use super::ReportEntry;

/// Punto de una serie temporal, serializado como objeto plano:
/// `{ "site_name": .., "label": "Feb'24", "period_start": .., <campo>: <valor> }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub site_name: String,
    pub label: String,
    pub period_start: NaiveDate,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

/// Un punto por submission, ordenado por inicio de periodo ascendente.
pub fn period_series(entries: &[ReportEntry], fields: &[&str]) -> Vec<ChartPoint> {
    let mut sorted: Vec<&ReportEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.submission.period_start);
    sorted.into_iter()
          .map(|e| ChartPoint { site_name: e.site_name.clone(),
                                label: period_label(e.submission.period_start),
                                period_start: e.submission.period_start,
                                values: fields.iter().map(|f| (f.to_string(), e.value(f))).collect() })
          .collect()
}

/// Fila de la tabla de reporte.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub site_name: String,
    pub label: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub submitted_by: String,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub environmental: DetailRecord,
    pub social: DetailRecord,
    pub governance: DetailRecord,
}

/// Una fila por submission, ordenada por periodo y luego por sitio.
pub fn report_table(entries: &[ReportEntry]) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = entries.iter()
                                          .map(|e| ReportRow { site_name: e.site_name.clone(),
                                                               label: period_label(e.submission.period_start),
                                                               period_start: e.submission.period_start,
                                                               period_end: e.submission.period_end,
                                                               submitted_by: e.submission.submitted_by.clone(),
                                                               reviewer: e.submission.reviewer.clone(),
                                                               reviewed_at: e.submission.reviewed_at,
                                                               environmental: e.environmental.clone(),
                                                               social: e.social.clone(),
                                                               governance: e.governance.clone() })
                                          .collect();
    rows.sort_by(|a, b| a.period_start.cmp(&b.period_start).then_with(|| a.site_name.cmp(&b.site_name)));
    rows
}

/// Indicadores de cabecera del tablero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub approved_submissions: usize,
    pub sites: usize,
    pub total_electricity: f64,
    pub renewable_percentage: f64,
    pub water_consumption: f64,
    pub total_waste: f64,
    pub total_employees: f64,
    pub fugitive_emissions: FugitiveEmissions,
    pub fugitive_emissions_tco2e: f64,
}

pub fn dashboard_summary(entries: &[ReportEntry]) -> DashboardSummary {
    let env: Vec<&DetailRecord> = entries.iter().map(|e| &e.environmental).collect();
    let sum = |col: EnvironmentalColumn| env.iter().map(|r| r.get(col.as_str())).sum::<f64>();
    let fugitive = fugitive_emissions(env.iter().copied());
    let sites: HashSet<_> = entries.iter().map(|e| e.submission.site_id).collect();
    DashboardSummary { approved_submissions: entries.len(),
                       sites: sites.len(),
                       total_electricity: sum(EnvironmentalColumn::TotalElectricity),
                       renewable_percentage: renewable_percentage(env.iter().copied()),
                       water_consumption: sum(EnvironmentalColumn::WaterConsumption),
                       total_waste: sum(EnvironmentalColumn::TotalWaste),
                       total_employees: entries.iter()
                                               .map(|e| e.social.get(SocialColumn::TotalEmployees.as_str()))
                                               .sum(),
                       fugitive_emissions_tco2e: fugitive_emissions_tco2e(&fugitive).total,
                       fugitive_emissions: fugitive }
}
