use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sitio físico (planta, oficina, almacén) que reporta métricas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub site_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSite {
    pub name: String,
    pub location: Option<String>,
    pub site_type: Option<String>,
}
