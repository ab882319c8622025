//! Métricas agregadas sobre registros ambientales.
use esg_domain::{DetailRecord, EnvironmentalColumn};
use serde::Serialize;

use crate::constants::{KG_PER_TONNE, REFRIGERANT_GWP};

/// Porcentaje de electricidad renovable:
/// `100 * Σ(renewable_ppa + renewable_rooftop) / Σ total_electricity`.
///
/// Vale 0 cuando el total de electricidad suma 0.
pub fn renewable_percentage<'a>(rows: impl IntoIterator<Item = &'a DetailRecord>) -> f64 {
    let (renewable, total) = rows.into_iter().fold((0.0, 0.0), |(r, t), row| {
                                                 (r + row.get(EnvironmentalColumn::RenewablePpa.as_str())
                                                  + row.get(EnvironmentalColumn::RenewableRooftop.as_str()),
                                                  t + row.get(EnvironmentalColumn::TotalElectricity.as_str()))
                                             });
    if total == 0.0 {
        0.0
    } else {
        100.0 * renewable / total
    }
}

/// Emisiones fugitivas en kg por refrigerante.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FugitiveEmissions {
    pub r22: f64,
    pub r32: f64,
    pub r410: f64,
    pub r134a: f64,
    pub r514a: f64,
    pub co2: f64,
    pub total: f64,
}

impl FugitiveEmissions {
    pub fn component(&self, column: EnvironmentalColumn) -> f64 {
        match column {
            EnvironmentalColumn::R22 => self.r22,
            EnvironmentalColumn::R32 => self.r32,
            EnvironmentalColumn::R410 => self.r410,
            EnvironmentalColumn::R134a => self.r134a,
            EnvironmentalColumn::R514a => self.r514a,
            EnvironmentalColumn::Co2 => self.co2,
            _ => 0.0,
        }
    }
}

/// Suma por refrigerante; `total` es la suma simple (sin ponderar) de los
/// seis componentes.
pub fn fugitive_emissions<'a>(rows: impl IntoIterator<Item = &'a DetailRecord>) -> FugitiveEmissions {
    let mut out = FugitiveEmissions::default();
    for row in rows {
        out.r22 += row.get(EnvironmentalColumn::R22.as_str());
        out.r32 += row.get(EnvironmentalColumn::R32.as_str());
        out.r410 += row.get(EnvironmentalColumn::R410.as_str());
        out.r134a += row.get(EnvironmentalColumn::R134a.as_str());
        out.r514a += row.get(EnvironmentalColumn::R514a.as_str());
        out.co2 += row.get(EnvironmentalColumn::Co2.as_str());
    }
    out.total = out.r22 + out.r32 + out.r410 + out.r134a + out.r514a + out.co2;
    out
}

/// Emisiones fugitivas ponderadas por GWP, en tCO2e. Sólo presentación.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FugitiveEmissionsCo2e {
    pub components: Vec<(String, f64)>,
    pub total: f64,
}

pub fn fugitive_emissions_tco2e(kg: &FugitiveEmissions) -> FugitiveEmissionsCo2e {
    let components: Vec<(String, f64)> = REFRIGERANT_GWP.iter()
                                                        .map(|(col, gwp)| {
                                                            (col.as_str().to_string(), kg.component(*col) * gwp / KG_PER_TONNE)
                                                        })
                                                        .collect();
    let total = components.iter().map(|(_, v)| v).sum();
    FugitiveEmissionsCo2e { components, total }
}
