//! Cuentas de identidad

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Usuario - mapea a la tabla usuarios. El hash nunca se serializa.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub email: String,
    pub nombre: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub email: String,
    pub nombre: String,
    pub password_hash: String,
}
