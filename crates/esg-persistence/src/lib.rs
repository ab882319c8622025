//! esg-persistence
//!
//! Backend Postgres (Diesel) del `EsgStore` del core.
//!
//! Módulos:
//! - `pg`: pool r2d2, filas Diesel y `PgEsgStore`.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas a mano.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgEsgStore, PgPool, PoolProvider};
