//! Modelo de Empresa
//!
//! Empresa que actúa como punto de origen de los repartos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Coordenada, EstadoGeneral};

/// Empresa principal - mapea exactamente a la tabla empresas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Empresa {
    pub id: i64,
    pub nombre: String,
    pub direccion: String,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub estado: EstadoGeneral,
    pub created_at: DateTime<Utc>,
}

impl Empresa {
    pub fn coordenada(&self) -> Option<Coordenada> {
        Coordenada::desde_columnas(self.latitud, self.longitud)
    }

    pub fn esta_activa(&self) -> bool {
        self.estado == EstadoGeneral::Activo
    }
}
