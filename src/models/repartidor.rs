//! Modelo de Repartidor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::EstadoGeneral;

/// Repartidor - mapea a la tabla repartidores.
/// `user_auth_id` enlaza con la cuenta de identidad (`usuarios.id`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Repartidor {
    pub id: i64,
    pub nombre: String,
    pub apellido: Option<String>,
    pub user_auth_id: Option<Uuid>,
    pub estado: EstadoGeneral,
    pub created_at: DateTime<Utc>,
}

impl Repartidor {
    pub fn esta_activo(&self) -> bool {
        self.estado == EstadoGeneral::Activo
    }
}
