use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EsgType;

/// Agrupación nombrada de parámetros dentro de un tipo ESG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub esg_type: EsgType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub esg_type: EsgType,
}

/// Métrica hoja del catálogo. Su nombre normalizado debe coincidir con una
/// columna de la tabla de detalle del tipo ESG de su categoría.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: Uuid,
    pub name: String,
    pub unit: Option<String>,
    pub category_id: Uuid,
}

impl Parameter {
    pub fn normalized_name(&self) -> String {
        normalize_parameter_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParameter {
    pub name: String,
    pub unit: Option<String>,
    pub category_id: Uuid,
}

/// Normaliza el nombre visible de un parámetro a su clave de columna:
/// minúsculas y cada tramo de espacios reemplazado por un único `_`.
///
/// `"Total Electricity"` -> `"total_electricity"`.
pub fn normalize_parameter_name(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
