//! Columnas declaradas de las tres tablas de detalle.
//!
//! Cada parámetro del catálogo se almacena en la columna cuyo nombre coincide
//! con su nombre normalizado. Declarar las columnas como enums permite validar
//! ese contrato al definir el catálogo y antes de escribir en el store, en vez
//! de descubrir el desajuste al insertar.
//!
//! El orden de las variantes coincide con el orden de columnas de
//! `esg-persistence::schema`.

use std::fmt;
use std::str::FromStr;

use crate::DomainError;

macro_rules! detail_columns {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $column:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];
            pub const NAMES: &'static [&'static str] = &[$($column,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $column,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($column => Ok($name::$variant),)*
                    _ => Err(DomainError::UnknownValue { kind: stringify!($name), value: s.to_string() }),
                }
            }
        }
    };
}

detail_columns! {
    /// Columnas de `environmental_data`. Energía en kWh, combustibles en
    /// litros/kg, agua en kL, residuos en t, refrigerantes en kg.
    EnvironmentalColumn {
        TotalElectricity => "total_electricity",
        GridElectricity => "grid_electricity",
        RenewablePpa => "renewable_ppa",
        RenewableRooftop => "renewable_rooftop",
        DieselConsumption => "diesel_consumption",
        PetrolConsumption => "petrol_consumption",
        LpgConsumption => "lpg_consumption",
        PngConsumption => "png_consumption",
        CoalConsumption => "coal_consumption",
        WaterWithdrawal => "water_withdrawal",
        WaterConsumption => "water_consumption",
        WaterRecycled => "water_recycled",
        TotalWaste => "total_waste",
        HazardousWaste => "hazardous_waste",
        NonHazardousWaste => "non_hazardous_waste",
        WasteRecycled => "waste_recycled",
        Nox => "nox",
        Sox => "sox",
        ParticulateMatter => "particulate_matter",
        R22 => "r22",
        R32 => "r32",
        R410 => "r410",
        R134a => "r134a",
        R514a => "r514a",
        Co2 => "co2",
    }
}

detail_columns! {
    /// Columnas de `social_data`.
    SocialColumn {
        TotalEmployees => "total_employees",
        MaleEmployees => "male_employees",
        FemaleEmployees => "female_employees",
        NewHires => "new_hires",
        Attrition => "attrition",
        TrainingHours => "training_hours",
        SafetyTrainings => "safety_trainings",
        LostTimeInjuries => "lost_time_injuries",
        Fatalities => "fatalities",
        NearMisses => "near_misses",
        CsrSpend => "csr_spend",
        CommunityBeneficiaries => "community_beneficiaries",
    }
}

detail_columns! {
    /// Columnas de `governance_data`.
    GovernanceColumn {
        BoardMembers => "board_members",
        IndependentDirectors => "independent_directors",
        WomenDirectors => "women_directors",
        BoardMeetings => "board_meetings",
        EthicsComplaints => "ethics_complaints",
        WhistleblowerReports => "whistleblower_reports",
        DataBreaches => "data_breaches",
        AntiCorruptionTrainings => "anti_corruption_trainings",
        PolicyViolations => "policy_violations",
    }
}

impl EnvironmentalColumn {
    /// Las seis columnas de refrigerantes que componen las emisiones fugitivas.
    pub const REFRIGERANTS: [EnvironmentalColumn; 6] = [EnvironmentalColumn::R22,
                                                         EnvironmentalColumn::R32,
                                                         EnvironmentalColumn::R410,
                                                         EnvironmentalColumn::R134a,
                                                         EnvironmentalColumn::R514a,
                                                         EnvironmentalColumn::Co2];
}
