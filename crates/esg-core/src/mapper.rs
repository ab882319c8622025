//! Mapeo formulario <-> registros de detalle.
//!
//! El formulario se indexa por id de parámetro; las tablas de detalle por
//! nombre de columna. El puente es el nombre normalizado del parámetro.
use std::collections::HashMap;

use esg_domain::{DetailRecord, EsgType, SubmissionDetails};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogStructure;

/// Valor crudo de un campo del formulario (texto o número).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Coerción numérica: texto no numérico, vacío o no finito -> 0.
    pub fn to_number(&self) -> f64 {
        let n = match self {
            FormValue::Number(n) => *n,
            FormValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if n.is_finite() {
            n
        } else {
            0.0
        }
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

/// Entrada del formulario: id de parámetro -> valor crudo.
pub type FormInput = HashMap<Uuid, FormValue>;

/// Dos parámetros del mismo tipo ESG con igual nombre normalizado; el
/// segundo procesado sobrescribió al primero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameCollision {
    pub esg_type: EsgType,
    pub column: String,
    pub overwritten: Uuid,
    pub winner: Uuid,
}

/// Payload de escritura por tabla de detalle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappedPayload {
    pub environmental: DetailRecord,
    pub social: DetailRecord,
    pub governance: DetailRecord,
    pub collisions: Vec<NameCollision>,
}

impl MappedPayload {
    pub fn record(&self, esg_type: EsgType) -> &DetailRecord {
        match esg_type {
            EsgType::Environmental => &self.environmental,
            EsgType::Social => &self.social,
            EsgType::Governance => &self.governance,
        }
    }

    fn record_mut(&mut self, esg_type: EsgType) -> &mut DetailRecord {
        match esg_type {
            EsgType::Environmental => &mut self.environmental,
            EsgType::Social => &mut self.social,
            EsgType::Governance => &mut self.governance,
        }
    }
}

/// Convierte la entrada del formulario en tres registros planos indexados
/// por nombre normalizado.
///
/// Recorre tipo ESG -> categoría -> parámetro en el orden de la estructura y
/// sólo incluye parámetros con valor presente en `input`. Si dos parámetros
/// del mismo tipo normalizan al mismo nombre, gana el último procesado y se
/// registra la colisión. Los nombres sin columna física se incluyen igual; el
/// store los rechaza antes de escribir.
pub fn map_form(structure: &CatalogStructure, input: &FormInput) -> MappedPayload {
    let mut payload = MappedPayload::default();
    let mut owners: HashMap<(EsgType, String), Uuid> = HashMap::new();
    for esg_type in EsgType::ALL {
        for parameter in structure.parameters(esg_type) {
            let Some(raw) = input.get(&parameter.id) else { continue };
            let column = parameter.normalized_name();
            let value = raw.to_number();
            if let Some(previous) = owners.insert((esg_type, column.clone()), parameter.id) {
                warn!("map_form: '{}' en {} sobrescrito por parámetro {}", column, esg_type, parameter.id);
                payload.collisions.push(NameCollision { esg_type,
                                                        column: column.clone(),
                                                        overwritten: previous,
                                                        winner: parameter.id });
            }
            payload.record_mut(esg_type).insert(column, value);
        }
    }
    debug!("map_form:done input={} environmental={} social={} governance={} collisions={}",
           input.len(),
           payload.environmental.len(),
           payload.social.len(),
           payload.governance.len(),
           payload.collisions.len());
    payload
}

/// Dirección inversa: valores almacenados de una submission indexados por id
/// de parámetro, para mostrarla en el formulario.
pub fn form_values(structure: &CatalogStructure, details: &SubmissionDetails) -> HashMap<Uuid, f64> {
    let mut values = HashMap::new();
    for esg_type in EsgType::ALL {
        let record = details.record(esg_type);
        for parameter in structure.parameters(esg_type) {
            if let Some(v) = record.value(&parameter.normalized_name()) {
                values.insert(parameter.id, v);
            }
        }
    }
    values
}
