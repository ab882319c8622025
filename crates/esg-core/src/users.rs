//! Directorio de usuarios inyectable.
//!
//! No hay autenticación: la identidad del usuario actual proviene de la
//! configuración. El directorio sólo lista quién puede enviar o revisar.
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use esg_domain::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Reviewer,
    Submitter,
}

impl UserRole {
    pub fn can_review(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Reviewer)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserRole::Admin => "admin",
            UserRole::Reviewer => "reviewer",
            UserRole::Submitter => "submitter",
        })
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "reviewer" => Ok(UserRole::Reviewer),
            "submitter" => Ok(UserRole::Submitter),
            other => Err(DomainError::UnknownValue { kind: "role", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

pub trait UserRepository {
    fn list_users(&self) -> Result<Vec<User>, CoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;
    fn add_user(&self, name: &str, email: &str, role: UserRole) -> Result<User, CoreError>;
    fn remove_user(&self, id: Uuid) -> Result<(), CoreError>;
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directorio con el usuario actual como administrador.
    pub fn seeded(current_user: &str) -> Self {
        let repo = Self::new();
        let name = current_user.split('@').next().unwrap_or(current_user).to_string();
        if let Ok(mut users) = repo.users.write() {
            users.push(User { id: Uuid::new_v4(), name, email: current_user.to_string(), role: UserRole::Admin });
        }
        repo
    }
}

impl UserRepository for InMemoryUserRepository {
    fn list_users(&self) -> Result<Vec<User>, CoreError> {
        self.users.read().map(|u| u.clone()).map_err(|_| CoreError::Storage("user directory lock poisoned".into()))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(self.list_users()?.into_iter().find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    fn add_user(&self, name: &str, email: &str, role: UserRole) -> Result<User, CoreError> {
        let email = email.trim();
        if name.trim().is_empty() || !email.contains('@') {
            return Err(CoreError::Validation("user requires a name and a valid email".into()));
        }
        let mut users = self.users.write().map_err(|_| CoreError::Storage("user directory lock poisoned".into()))?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(CoreError::Conflict(format!("user {email} already exists")));
        }
        let user = User { id: Uuid::new_v4(), name: name.trim().to_string(), email: email.to_string(), role };
        users.push(user.clone());
        Ok(user)
    }

    fn remove_user(&self, id: Uuid) -> Result<(), CoreError> {
        let mut users = self.users.write().map_err(|_| CoreError::Storage("user directory lock poisoned".into()))?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(CoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_directory_contains_current_user_as_admin() {
        let repo = InMemoryUserRepository::seeded("admin@esg.local");
        let user = repo.find_by_email("ADMIN@esg.local").unwrap().unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.name, "admin");
    }

    #[test]
    fn duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.add_user("Ana", "ana@plant.io", UserRole::Reviewer).unwrap();
        let err = repo.add_user("Ana B", "ana@plant.io", UserRole::Submitter).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn remove_unknown_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(repo.remove_user(Uuid::new_v4()), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn roles_that_can_review() {
        assert!(UserRole::Reviewer.can_review());
        assert!(!UserRole::Submitter.can_review());
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    }
}
