//! Filas Diesel y su conversión a tipos de dominio.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use esg_domain::{Category, DetailRecord, EsgType, Parameter, Site, Submission, SubmissionStatus};
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::schema::{categories, environmental_data, esg_submissions, governance_data, parameters, sites, social_data};

#[derive(Queryable, Insertable, Debug)]
#[diesel(table_name = sites)]
pub struct SiteRow {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub site_type: Option<String>,
}

impl From<SiteRow> for Site {
    fn from(row: SiteRow) -> Self {
        Site { id: row.id,
               name: row.name,
               location: row.location,
               site_type: row.site_type }
    }
}

#[derive(Queryable, Insertable, Debug)]
#[diesel(table_name = categories)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub esg_type: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = PersistenceError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let esg_type: EsgType = row.esg_type
                                   .parse()
                                   .map_err(|e| PersistenceError::Unknown(format!("categories.esg_type: {e}")))?;
        Ok(Category { id: row.id, name: row.name, esg_type })
    }
}

#[derive(Queryable, Insertable, Debug)]
#[diesel(table_name = parameters)]
pub struct ParameterRow {
    pub id: Uuid,
    pub name: String,
    pub unit: Option<String>,
    pub category_id: Uuid,
}

impl From<ParameterRow> for Parameter {
    fn from(row: ParameterRow) -> Self {
        Parameter { id: row.id,
                    name: row.name,
                    unit: row.unit,
                    category_id: row.category_id }
    }
}

/// Fila de `esg_submissions`. `submitted_at` y `updated_at` los asigna la base
/// (DEFAULT now()) al insertar.
#[derive(Queryable, Debug)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub site_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: String,
    pub submitted_by: String,
    pub reviewer: Option<String>,
    pub review_comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = PersistenceError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let status: SubmissionStatus =
            row.status
               .parse()
               .map_err(|e| PersistenceError::Unknown(format!("esg_submissions.status: {e}")))?;
        Ok(Submission { id: row.id,
                        site_id: row.site_id,
                        period_start: row.period_start,
                        period_end: row.period_end,
                        status,
                        submitted_by: row.submitted_by,
                        reviewer: row.reviewer,
                        review_comment: row.review_comment,
                        submitted_at: row.submitted_at,
                        reviewed_at: row.reviewed_at,
                        updated_at: row.updated_at })
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = esg_submissions)]
pub struct NewSubmissionRow<'a> {
    pub id: Uuid,
    pub site_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: &'a str,
    pub submitted_by: &'a str,
}

// Fila leída + fila a insertar por tabla de detalle. Columnas ausentes del
// payload se guardan como NULL y no reaparecen en el `DetailRecord` leído.
macro_rules! detail_rows {
    ($row:ident, $new_row:ident, $table:ident, [$($col:ident),+ $(,)?]) => {
        #[derive(Queryable, Debug)]
        pub struct $row {
            pub id: Uuid,
            pub submission_id: Uuid,
            $(pub $col: Option<f64>,)+
        }

        impl $row {
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($col)),+];

            pub fn into_record(self) -> DetailRecord {
                let mut record = DetailRecord::new();
                $(
                    if let Some(v) = self.$col {
                        record.insert(stringify!($col), v);
                    }
                )+
                record
            }

            /// Registro de detalle de una submission; `None` si la fila no existe.
            pub fn load(conn: &mut PgConnection, submission_id: Uuid) -> QueryResult<Option<DetailRecord>> {
                $table::table.filter($table::submission_id.eq(submission_id))
                             .first::<$row>(conn)
                             .optional()
                             .map(|row| row.map($row::into_record))
            }
        }

        #[derive(Insertable, Debug)]
        #[diesel(table_name = $table)]
        pub struct $new_row {
            pub id: Uuid,
            pub submission_id: Uuid,
            $(pub $col: Option<f64>,)+
        }

        impl $new_row {
            pub fn from_payload(submission_id: Uuid, record: &DetailRecord) -> Self {
                Self { id: Uuid::new_v4(),
                       submission_id,
                       $($col: record.value(stringify!($col)),)+ }
            }
        }
    };
}

detail_rows!(EnvironmentalRow,
             NewEnvironmentalRow,
             environmental_data,
             [total_electricity,
              grid_electricity,
              renewable_ppa,
              renewable_rooftop,
              diesel_consumption,
              petrol_consumption,
              lpg_consumption,
              png_consumption,
              coal_consumption,
              water_withdrawal,
              water_consumption,
              water_recycled,
              total_waste,
              hazardous_waste,
              non_hazardous_waste,
              waste_recycled,
              nox,
              sox,
              particulate_matter,
              r22,
              r32,
              r410,
              r134a,
              r514a,
              co2]);

detail_rows!(SocialRow,
             NewSocialRow,
             social_data,
             [total_employees,
              male_employees,
              female_employees,
              new_hires,
              attrition,
              training_hours,
              safety_trainings,
              lost_time_injuries,
              fatalities,
              near_misses,
              csr_spend,
              community_beneficiaries]);

detail_rows!(GovernanceRow,
             NewGovernanceRow,
             governance_data,
             [board_members,
              independent_directors,
              women_directors,
              board_meetings,
              ethics_complaints,
              whistleblower_reports,
              data_breaches,
              anti_corruption_trainings,
              policy_violations]);
