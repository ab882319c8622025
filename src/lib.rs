//! esgflow
//!
//! Fachada del tablero ESG sobre un `EsgStore`:
//! - `EsgApp` agrupa catálogo, ciclo de aprobación, reportes y usuarios.
//! - `config` y `logging` configuran el binario `esg`.
//! - `cli` parsea y ejecuta los comandos del binario.

pub mod cli;
pub mod config;
pub mod logging;

use esg_core::{CoreError, EsgStore, InMemoryEsgStore, InMemoryUserRepository, ParameterCatalog, Reports,
               SubmissionLifecycle, User, UserRepository};

use crate::config::AppConfig;

/// Tablero sobre un store y un directorio de usuarios inyectados.
pub struct EsgApp<S: EsgStore, U: UserRepository = InMemoryUserRepository> {
    store: S,
    users: U,
    current_user: String,
}

impl<S: EsgStore, U: UserRepository> EsgApp<S, U> {
    pub fn new(store: S, users: U, config: &AppConfig) -> Self {
        Self { store, users, current_user: config.current_user.clone() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> ParameterCatalog<'_, S> {
        ParameterCatalog::new(&self.store)
    }

    pub fn submissions(&self) -> SubmissionLifecycle<'_, S> {
        SubmissionLifecycle::new(&self.store)
    }

    pub fn reports(&self) -> Reports<'_, S> {
        Reports::new(&self.store)
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    /// Usuario que envía y revisa (no hay autenticación).
    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// Usuario actual, si su rol en el directorio le permite revisar.
    pub fn reviewer(&self) -> Result<User, CoreError> {
        let user = self.users
                       .find_by_email(&self.current_user)?
                       .ok_or_else(|| CoreError::Validation(format!("user {} is not in the directory",
                                                                    self.current_user)))?;
        if !user.role.can_review() {
            return Err(CoreError::Validation(format!("user {} ({}) cannot review submissions", user.email, user.role)));
        }
        Ok(user)
    }
}

impl<S: EsgStore> EsgApp<S, InMemoryUserRepository> {
    /// Directorio en memoria con el usuario actual como administrador.
    pub fn with_seeded_users(store: S, config: &AppConfig) -> Self {
        Self::new(store, InMemoryUserRepository::seeded(&config.current_user), config)
    }
}

impl EsgApp<InMemoryEsgStore> {
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::with_seeded_users(InMemoryEsgStore::new(), config)
    }
}
