use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns::{EnvironmentalColumn, GovernanceColumn, SocialColumn};
use crate::DomainError;

/// Tipo ESG de primer nivel. Cada tipo corresponde a una tabla de detalle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsgType {
    Environmental,
    Social,
    Governance,
}

impl EsgType {
    /// Orden canónico usado para construir estructuras y payloads.
    pub const ALL: [EsgType; 3] = [EsgType::Environmental, EsgType::Social, EsgType::Governance];

    pub fn as_str(&self) -> &'static str {
        match self {
            EsgType::Environmental => "environmental",
            EsgType::Social => "social",
            EsgType::Governance => "governance",
        }
    }

    /// Nombre de la tabla de detalle que almacena los valores de este tipo.
    pub fn detail_table(&self) -> &'static str {
        match self {
            EsgType::Environmental => "environmental_data",
            EsgType::Social => "social_data",
            EsgType::Governance => "governance_data",
        }
    }

    /// Columnas físicas declaradas para la tabla de detalle de este tipo.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            EsgType::Environmental => EnvironmentalColumn::NAMES,
            EsgType::Social => SocialColumn::NAMES,
            EsgType::Governance => GovernanceColumn::NAMES,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns().contains(&name)
    }
}

impl fmt::Display for EsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EsgType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environmental" => Ok(EsgType::Environmental),
            "social" => Ok(EsgType::Social),
            "governance" => Ok(EsgType::Governance),
            _ => Err(DomainError::UnknownValue { kind: "esg type", value: s.to_string() }),
        }
    }
}
