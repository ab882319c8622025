//! Constantes del core ESG.

use esg_domain::EnvironmentalColumn;

/// Potencial de calentamiento global (GWP, kgCO2e por kg) de cada
/// refrigerante. Sólo se usa para presentar emisiones fugitivas en tCO2e; no
/// se persiste ni entra en los totales en kg.
pub const REFRIGERANT_GWP: [(EnvironmentalColumn, f64); 6] = [(EnvironmentalColumn::R22, 1810.0),
                                                              (EnvironmentalColumn::R32, 675.0),
                                                              (EnvironmentalColumn::R410, 2088.0),
                                                              (EnvironmentalColumn::R134a, 1430.0),
                                                              (EnvironmentalColumn::R514a, 2.0),
                                                              (EnvironmentalColumn::Co2, 1.0)];

/// kg por tonelada.
pub const KG_PER_TONNE: f64 = 1000.0;
