use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Periodo de reporte cerrado `[start, end]`.
///
/// Invariante: `start <= end`. Los formularios reportan meses calendario
/// completos (`for_month`), pero el tipo admite cualquier rango válido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingPeriod {
    /// Construye un periodo validando `start <= end`.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si el inicio es posterior al fin.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::ValidationError(format!("inicio de periodo {start} posterior al fin {end}")));
        }
        Ok(Self { start, end })
    }

    /// Mes calendario completo: del día 1 al último día del mes.
    ///
    /// Febrero 2024 -> `2024-02-01..=2024-02-29`.
    pub fn for_month(year: i32, month: u32) -> Result<Self, DomainError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DomainError::ValidationError(format!("mes inválido: {year}-{month}")))?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt())
                            .ok_or_else(|| DomainError::ValidationError(format!("mes fuera de rango: {year}-{month}")))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Etiqueta corta para gráficas, `MMM'YY` (ej. `Feb'24`).
    pub fn label(&self) -> String {
        period_label(self.start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }
}

/// Etiqueta `MMM'YY` de una fecha de inicio de periodo.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%b'%y").to_string()
}
