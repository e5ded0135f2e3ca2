//! Conteos por estado para los tableros del repartidor

use serde::Serialize;

use crate::models::{Envio, EstadoEnvio, EstadoReparto, Reparto};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EstadisticasRepartos {
    pub total: usize,
    pub planificados: usize,
    pub en_progreso: usize,
    pub completados: usize,
    pub cancelados: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EstadisticasEntregas {
    pub total: usize,
    pub pendientes: usize,
    pub asignadas: usize,
    pub en_progreso: usize,
    pub completadas: usize,
    pub canceladas: usize,
}

pub fn contar_repartos<'a>(repartos: impl IntoIterator<Item = &'a Reparto>) -> EstadisticasRepartos {
    repartos
        .into_iter()
        .fold(EstadisticasRepartos::default(), |mut e, reparto| {
            e.total += 1;
            match reparto.estado {
                EstadoReparto::Planificado => e.planificados += 1,
                EstadoReparto::EnProgreso => e.en_progreso += 1,
                EstadoReparto::Completado => e.completados += 1,
                EstadoReparto::Cancelado => e.cancelados += 1,
            }
            e
        })
}

/// Las paradas de inicio no son entregas y no se cuentan
pub fn contar_entregas<'a>(envios: impl IntoIterator<Item = &'a Envio>) -> EstadisticasEntregas {
    envios
        .into_iter()
        .filter(|envio| !envio.es_parada_inicio)
        .fold(EstadisticasEntregas::default(), |mut e, envio| {
            e.total += 1;
            match envio.estado {
                EstadoEnvio::PendienteAsignacion => e.pendientes += 1,
                EstadoEnvio::Asignado => e.asignadas += 1,
                EstadoEnvio::EnProgreso => e.en_progreso += 1,
                EstadoEnvio::Completado => e.completadas += 1,
                EstadoEnvio::Cancelado => e.canceladas += 1,
            }
            e
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn reparto(estado: EstadoReparto) -> Reparto {
        Reparto {
            id: 1,
            fecha_reparto: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            repartidor_id: 2,
            empresa_asociada_id: None,
            estado,
            notas: None,
            hora_inicio: None,
            hora_fin: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn envio(estado: EstadoEnvio, es_parada_inicio: bool) -> Envio {
        Envio {
            id: 1,
            direccion_origen: String::new(),
            latitud_origen: None,
            longitud_origen: None,
            direccion_destino: String::new(),
            latitud_destino: None,
            longitud_destino: None,
            empresa_origen_id: None,
            remitente_cliente_id: None,
            nombre_destinatario: None,
            telefono_destinatario: None,
            repartidor_asignado_id: Some(2),
            precio: Decimal::ZERO,
            estado,
            fecha_estimada_entrega: None,
            fecha_entrega_real: None,
            foto_comprobante: None,
            es_parada_inicio,
            detalles_adicionales: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn cuenta_repartos_por_estado() {
        let repartos = vec![
            reparto(EstadoReparto::Planificado),
            reparto(EstadoReparto::Planificado),
            reparto(EstadoReparto::Completado),
        ];
        let e = contar_repartos(&repartos);
        assert_eq!(e.total, 3);
        assert_eq!(e.planificados, 2);
        assert_eq!(e.completados, 1);
        assert_eq!(e.en_progreso + e.cancelados, 0);
    }

    #[test]
    fn entregas_excluyen_parada_de_inicio() {
        let envios = vec![
            envio(EstadoEnvio::Asignado, true),
            envio(EstadoEnvio::Asignado, false),
            envio(EstadoEnvio::Completado, false),
        ];
        let e = contar_entregas(&envios);
        assert_eq!(e.total, 2);
        assert_eq!(e.asignadas, 1);
        assert_eq!(e.completadas, 1);
    }
}
