//! Implementación Postgres (Diesel) de `EsgStore`.
//!
//! Paridad 1:1 con `InMemoryEsgStore`:
//! - listados de sitios, categorías y parámetros ordenados por nombre;
//! - `create_submission` inserta cabecera y las tres filas de detalle en una
//!   sola transacción; cualquier fallo revierte todo;
//! - `fetch_submission_details` trata una fila de detalle ausente como
//!   registro vacío;
//! - sin reintentos: los errores se propagan al llamador.

pub mod rows;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use esg_core::{CoreError, EsgStore, NewSubmission};
use esg_domain::{Category, EsgType, NewCategory, NewParameter, NewSite, Parameter, Site, Submission,
                 SubmissionDetails, SubmissionStatus, SubmissionSummary};
use log::{debug, error, warn};
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{categories, environmental_data, esg_submissions, governance_data, parameters, sites, social_data};
use rows::{CategoryRow, EnvironmentalRow, GovernanceRow, NewEnvironmentalRow, NewGovernanceRow, NewSocialRow,
           NewSubmissionRow, ParameterRow, SiteRow, SocialRow, SubmissionRow};

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o, en tests, cualquier otra fuente de
/// conexiones sin acoplar el store a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Convierte un error de persistencia en `CoreError`, registrando los fallos
/// del backend antes de propagarlos.
fn backend(err: PersistenceError) -> CoreError {
    if matches!(err, PersistenceError::Unknown(_) | PersistenceError::TransientIo(_)) {
        error!("backend error: {err}");
    }
    err.into()
}

fn db<T>(result: QueryResult<T>) -> Result<T, CoreError> {
    result.map_err(|e| backend(e.into()))
}

/// `EsgStore` sobre Postgres.
pub struct PgEsgStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgEsgStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn conn(&self) -> Result<PgPooledConnection, CoreError> {
        self.provider.connection().map_err(backend)
    }
}

impl PgEsgStore<PoolProvider> {
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(PoolProvider { pool })
    }
}

impl<P: ConnectionProvider> EsgStore for PgEsgStore<P> {
    fn list_sites(&self) -> Result<Vec<Site>, CoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<SiteRow> = db(sites::table.order(sites::name.asc()).load(&mut conn))?;
        Ok(rows.into_iter().map(Site::from).collect())
    }

    fn find_site(&self, id: Uuid) -> Result<Option<Site>, CoreError> {
        let mut conn = self.conn()?;
        let row: Option<SiteRow> = db(sites::table.find(id).first(&mut conn).optional())?;
        Ok(row.map(Site::from))
    }

    fn insert_site(&self, site: NewSite) -> Result<Site, CoreError> {
        let mut conn = self.conn()?;
        let row = SiteRow { id: Uuid::new_v4(),
                            name: site.name,
                            location: site.location,
                            site_type: site.site_type };
        let inserted: SiteRow = db(diesel::insert_into(sites::table).values(&row).get_result(&mut conn))?;
        debug!("insert_site:done id={}", inserted.id);
        Ok(inserted.into())
    }

    fn delete_site(&self, id: Uuid) -> Result<(), CoreError> {
        let mut conn = self.conn()?;
        // FK RESTRICT desde esg_submissions -> Conflict
        let deleted = db(diesel::delete(sites::table.find(id)).execute(&mut conn))?;
        if deleted == 0 {
            return Err(CoreError::NotFound(format!("site {id}")));
        }
        Ok(())
    }

    fn list_categories(&self, esg_type: Option<EsgType>) -> Result<Vec<Category>, CoreError> {
        let mut conn = self.conn()?;
        let mut query = categories::table.order(categories::name.asc()).into_boxed();
        if let Some(t) = esg_type {
            query = query.filter(categories::esg_type.eq(t.as_str()));
        }
        let rows: Vec<CategoryRow> = db(query.load(&mut conn))?;
        rows.into_iter()
            .map(|r| Category::try_from(r).map_err(CoreError::from))
            .collect()
    }

    fn find_category(&self, id: Uuid) -> Result<Option<Category>, CoreError> {
        let mut conn = self.conn()?;
        let row: Option<CategoryRow> = db(categories::table.find(id).first(&mut conn).optional())?;
        Ok(row.map(Category::try_from).transpose()?)
    }

    fn insert_category(&self, category: NewCategory) -> Result<Category, CoreError> {
        let mut conn = self.conn()?;
        let row = CategoryRow { id: Uuid::new_v4(),
                                name: category.name,
                                esg_type: category.esg_type.as_str().to_string() };
        // UNIQUE (esg_type, name) -> Conflict
        let inserted: CategoryRow = db(diesel::insert_into(categories::table).values(&row).get_result(&mut conn))?;
        Ok(Category::try_from(inserted)?)
    }

    fn delete_category(&self, id: Uuid) -> Result<(), CoreError> {
        let mut conn = self.conn()?;
        // parámetros en cascada (ON DELETE CASCADE)
        let deleted = db(diesel::delete(categories::table.find(id)).execute(&mut conn))?;
        if deleted == 0 {
            return Err(CoreError::NotFound(format!("category {id}")));
        }
        Ok(())
    }

    fn list_parameters(&self, category_id: Option<Uuid>) -> Result<Vec<Parameter>, CoreError> {
        let mut conn = self.conn()?;
        let mut query = parameters::table.order(parameters::name.asc()).into_boxed();
        if let Some(c) = category_id {
            query = query.filter(parameters::category_id.eq(c));
        }
        let rows: Vec<ParameterRow> = db(query.load(&mut conn))?;
        Ok(rows.into_iter().map(Parameter::from).collect())
    }

    fn insert_parameter(&self, parameter: NewParameter) -> Result<Parameter, CoreError> {
        let mut conn = self.conn()?;
        let row = ParameterRow { id: Uuid::new_v4(),
                                 name: parameter.name,
                                 unit: parameter.unit,
                                 category_id: parameter.category_id };
        let inserted: ParameterRow = db(diesel::insert_into(parameters::table).values(&row).get_result(&mut conn))?;
        Ok(inserted.into())
    }

    fn delete_parameter(&self, id: Uuid) -> Result<(), CoreError> {
        let mut conn = self.conn()?;
        let deleted = db(diesel::delete(parameters::table.find(id)).execute(&mut conn))?;
        if deleted == 0 {
            return Err(CoreError::NotFound(format!("parameter {id}")));
        }
        Ok(())
    }

    fn create_submission(&self, submission: NewSubmission) -> Result<Uuid, CoreError> {
        submission.validate()?;
        debug!("create_submission:start site={} period={}",
               submission.site_id,
               submission.period.label());
        let mut conn = self.conn()?;
        // Cabecera + tres filas de detalle en una única transacción.
        let created: Option<Uuid> =
            conn.build_transaction()
                .read_write()
                .run(|tx| {
                    let site_exists: bool =
                        diesel::select(diesel::dsl::exists(sites::table.find(submission.site_id))).get_result(tx)?;
                    if !site_exists {
                        return Ok(None);
                    }
                    let id = Uuid::new_v4();
                    let header = NewSubmissionRow { id,
                                                    site_id: submission.site_id,
                                                    period_start: submission.period.start(),
                                                    period_end: submission.period.end(),
                                                    status: submission.status.as_str(),
                                                    submitted_by: &submission.submitted_by };
                    diesel::insert_into(esg_submissions::table)
                        .values(&header)
                        .execute(tx)
                        .map_err(|e| PersistenceError::in_table(e, "esg_submissions"))?;
                    diesel::insert_into(environmental_data::table)
                        .values(NewEnvironmentalRow::from_payload(id, &submission.environmental))
                        .execute(tx)
                        .map_err(|e| PersistenceError::in_table(e, "environmental_data"))?;
                    diesel::insert_into(social_data::table)
                        .values(NewSocialRow::from_payload(id, &submission.social))
                        .execute(tx)
                        .map_err(|e| PersistenceError::in_table(e, "social_data"))?;
                    diesel::insert_into(governance_data::table)
                        .values(NewGovernanceRow::from_payload(id, &submission.governance))
                        .execute(tx)
                        .map_err(|e| PersistenceError::in_table(e, "governance_data"))?;
                    Ok::<Option<Uuid>, PersistenceError>(Some(id))
                })
                .map_err(backend)?;
        match created {
            Some(id) => {
                debug!("create_submission:done id={id}");
                Ok(id)
            }
            None => Err(CoreError::Validation(format!("site {} does not exist", submission.site_id))),
        }
    }

    fn fetch_submissions(&self) -> Result<Vec<SubmissionSummary>, CoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<(SubmissionRow, String)> =
            db(esg_submissions::table.inner_join(sites::table)
                                     .select((esg_submissions::all_columns, sites::name))
                                     .order((esg_submissions::updated_at.desc(), esg_submissions::submitted_at.desc()))
                                     .load(&mut conn))?;
        let mut out = Vec::with_capacity(rows.len());
        for (row, site_name) in rows {
            out.push(SubmissionSummary { submission: Submission::try_from(row)?, site_name });
        }
        debug!("fetch_submissions:done count={}", out.len());
        Ok(out)
    }

    fn find_submission(&self, id: Uuid) -> Result<Option<Submission>, CoreError> {
        let mut conn = self.conn()?;
        let row: Option<SubmissionRow> = db(esg_submissions::table.find(id).first(&mut conn).optional())?;
        Ok(row.map(Submission::try_from).transpose()?)
    }

    fn fetch_submission_details(&self, id: Uuid) -> Result<SubmissionDetails, CoreError> {
        let mut conn = self.conn()?;
        let loaded = conn.build_transaction()
                         .read_only()
                         .run(|tx| {
                             let Some(header) = esg_submissions::table.find(id)
                                                                       .first::<SubmissionRow>(tx)
                                                                       .optional()?
                             else {
                                 return Ok(None);
                             };
                             let env = EnvironmentalRow::load(tx, id)?;
                             let social = SocialRow::load(tx, id)?;
                             let gov = GovernanceRow::load(tx, id)?;
                             Ok::<_, PersistenceError>(Some((header, env, social, gov)))
                         })
                         .map_err(backend)?;
        let Some((header, env, social, gov)) = loaded else {
            return Err(CoreError::NotFound(format!("submission {id}")));
        };
        if env.is_none() || social.is_none() || gov.is_none() {
            warn!("fetch_submission_details: submission {id} sin alguna fila de detalle");
        }
        Ok(SubmissionDetails { submission: Submission::try_from(header)?,
                               environmental: env.unwrap_or_default(),
                               social: social.unwrap_or_default(),
                               governance: gov.unwrap_or_default() })
    }

    fn update_status(&self,
                     id: Uuid,
                     status: SubmissionStatus,
                     reviewer: &str,
                     comment: Option<&str>)
                     -> Result<Submission, CoreError> {
        let mut conn = self.conn()?;
        let now = Utc::now();
        let row: Option<SubmissionRow> =
            db(diesel::update(esg_submissions::table.find(id)).set((esg_submissions::status.eq(status.as_str()),
                                                                     esg_submissions::reviewer.eq(Some(reviewer)),
                                                                     esg_submissions::review_comment.eq(comment),
                                                                     esg_submissions::reviewed_at.eq(Some(now)),
                                                                     esg_submissions::updated_at.eq(now)))
                                                              .get_result(&mut conn)
                                                              .optional())?;
        let row = row.ok_or_else(|| CoreError::NotFound(format!("submission {id}")))?;
        debug!("update_status:done id={id} status={status}");
        Ok(Submission::try_from(row)?)
    }
}

/// Construye un pool Postgres r2d2 a partir de URL.
///
/// - Si `min_size > max_size`, usa `min_size = max_size`.
/// - Ejecuta migraciones pendientes tras el primer `get()`.
/// - Devuelve `PersistenceError::TransientIo` ante errores del pool/manager.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max", validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración (DATABASE_URL,
/// tamaños) y construye un pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
