//! Modelo de Envío
//!
//! Un envío es la unidad de entrega; cada parada de reparto envuelve uno.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Coordenada, EstadoEnvio};

/// Envío - mapea exactamente a la tabla envios
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Envio {
    pub id: i64,
    pub direccion_origen: String,
    pub latitud_origen: Option<f64>,
    pub longitud_origen: Option<f64>,
    pub direccion_destino: String,
    pub latitud_destino: Option<f64>,
    pub longitud_destino: Option<f64>,
    pub empresa_origen_id: Option<i64>,
    pub remitente_cliente_id: Option<i64>,
    pub nombre_destinatario: Option<String>,
    pub telefono_destinatario: Option<String>,
    pub repartidor_asignado_id: Option<i64>,
    pub precio: Decimal,
    pub estado: EstadoEnvio,
    pub fecha_estimada_entrega: Option<NaiveDate>,
    pub fecha_entrega_real: Option<DateTime<Utc>>,
    pub foto_comprobante: Option<String>,
    pub es_parada_inicio: bool,
    pub detalles_adicionales: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Envio {
    pub fn destino(&self) -> Option<Coordenada> {
        Coordenada::desde_columnas(self.latitud_destino, self.longitud_destino)
    }

    pub fn pertenece_a(&self, repartidor_id: i64) -> bool {
        self.repartidor_asignado_id == Some(repartidor_id)
    }
}

/// Datos de inserción de un envío
#[derive(Debug, Clone, PartialEq)]
pub struct NuevoEnvio {
    pub direccion_origen: String,
    pub origen: Option<Coordenada>,
    pub direccion_destino: String,
    pub destino: Option<Coordenada>,
    pub empresa_origen_id: Option<i64>,
    pub remitente_cliente_id: Option<i64>,
    pub nombre_destinatario: Option<String>,
    pub telefono_destinatario: Option<String>,
    pub repartidor_asignado_id: Option<i64>,
    pub precio: Decimal,
    pub estado: EstadoEnvio,
    pub fecha_estimada_entrega: Option<NaiveDate>,
    pub es_parada_inicio: bool,
    pub detalles_adicionales: Option<String>,
}

/// Cambio de estado ya validado contra la tabla de transiciones
#[derive(Debug, Clone)]
pub struct CambioEstadoEnvio {
    pub estado: EstadoEnvio,
    pub fecha_entrega_real: Option<DateTime<Utc>>,
    pub foto_comprobante: Option<String>,
}
