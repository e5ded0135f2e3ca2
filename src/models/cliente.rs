//! Modelo de Cliente

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Coordenada, EstadoGeneral};

/// Cliente - mapea exactamente a la tabla clientes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cliente {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub direccion: String,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub empresa_id: Option<i64>,
    pub estado: EstadoGeneral,
    pub created_at: DateTime<Utc>,
}

impl Cliente {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido).trim().to_string()
    }

    pub fn coordenada(&self) -> Option<Coordenada> {
        Coordenada::desde_columnas(self.latitud, self.longitud)
    }

    pub fn esta_activo(&self) -> bool {
        self.estado == EstadoGeneral::Activo
    }
}
