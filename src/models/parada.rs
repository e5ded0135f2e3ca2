//! Modelo de ParadaReparto

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Envio, EstadoParada, NuevoEnvio};

/// Parada de un reparto - mapea a la tabla paradas_reparto.
/// `orden_visita` es único dentro del reparto y define la secuencia.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParadaReparto {
    pub id: i64,
    pub reparto_id: i64,
    pub envio_id: i64,
    pub descripcion_parada: Option<String>,
    pub orden_visita: i32,
    pub estado_parada: EstadoParada,
    pub hora_estimada_llegada: Option<NaiveTime>,
    pub hora_real_llegada: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parada junto con su envío
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParadaConEnvio {
    #[serde(flatten)]
    pub parada: ParadaReparto,
    pub envio: Envio,
}

/// Parada a insertar junto con el envío que la respalda
#[derive(Debug, Clone, PartialEq)]
pub struct NuevaParada {
    pub orden_visita: i32,
    pub descripcion_parada: String,
    pub estado_parada: EstadoParada,
    pub envio: NuevoEnvio,
}

/// Cambio de estado ya validado; sólo `completado` trae hora real
#[derive(Debug, Clone)]
pub struct CambioEstadoParada {
    pub estado: EstadoParada,
    pub hora_real_llegada: Option<NaiveTime>,
}

/// Une paradas con sus envíos; las paradas sin envío se descartan
pub fn unir_con_envios(paradas: Vec<ParadaReparto>, envios: Vec<Envio>) -> Vec<ParadaConEnvio> {
    let mut por_id: std::collections::HashMap<i64, Envio> =
        envios.into_iter().map(|e| (e.id, e)).collect();

    let mut unidas: Vec<ParadaConEnvio> = paradas
        .into_iter()
        .filter_map(|parada| {
            por_id
                .remove(&parada.envio_id)
                .map(|envio| ParadaConEnvio { parada, envio })
        })
        .collect();
    unidas.sort_by_key(|p| (p.parada.reparto_id, p.parada.orden_visita));
    unidas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EstadoEnvio;
    use rust_decimal::Decimal;

    fn parada(id: i64, reparto_id: i64, envio_id: i64, orden: i32) -> ParadaReparto {
        ParadaReparto {
            id,
            reparto_id,
            envio_id,
            descripcion_parada: None,
            orden_visita: orden,
            estado_parada: EstadoParada::Asignado,
            hora_estimada_llegada: None,
            hora_real_llegada: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn envio(id: i64) -> Envio {
        Envio {
            id,
            direccion_origen: "Origen 1".to_string(),
            latitud_origen: None,
            longitud_origen: None,
            direccion_destino: format!("Destino {}", id),
            latitud_destino: None,
            longitud_destino: None,
            empresa_origen_id: None,
            remitente_cliente_id: None,
            nombre_destinatario: None,
            telefono_destinatario: None,
            repartidor_asignado_id: Some(1),
            precio: Decimal::ZERO,
            estado: EstadoEnvio::Asignado,
            fecha_estimada_entrega: None,
            fecha_entrega_real: None,
            foto_comprobante: None,
            es_parada_inicio: false,
            detalles_adicionales: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn une_y_ordena_por_reparto_y_orden() {
        let paradas = vec![parada(1, 2, 10, 1), parada(2, 1, 11, 1), parada(3, 1, 12, 0), parada(4, 1, 99, 2)];
        let envios = vec![envio(10), envio(11), envio(12)];

        let unidas = unir_con_envios(paradas, envios);
        let ids: Vec<i64> = unidas.iter().map(|p| p.parada.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(unidas[0].envio.id, 12);
    }
}
