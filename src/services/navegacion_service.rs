//! Enlaces de navegación paso a paso hacia una parada

use serde::Serialize;

use crate::models::{Coordenada, Envio};

const BASE_DIRECCIONES: &str = "https://www.google.com/maps/dir/?api=1";

#[derive(Debug, Clone, Serialize)]
pub struct EnlaceNavegacion {
    pub parada_id: i64,
    pub url: String,
    pub destino: String,
    /// Falso cuando el cliente no compartió su ubicación
    pub con_origen: bool,
}

fn formatear(coordenada: Coordenada) -> String {
    format!("{},{}", coordenada.lat, coordenada.lng)
}

/// URL de indicaciones. El destino usa coordenadas si existen y, si no, la
/// dirección escapada. Sin posición del repartidor se omite `origin`.
pub fn url_direcciones(envio: &Envio, origen: Option<Coordenada>) -> String {
    let mut url = String::from(BASE_DIRECCIONES);

    if let Some(origen) = origen.filter(Coordenada::es_valida) {
        url.push_str("&origin=");
        url.push_str(&formatear(origen));
    }

    url.push_str("&destination=");
    match envio.destino().filter(Coordenada::es_valida) {
        Some(destino) => url.push_str(&formatear(destino)),
        None => url.push_str(&urlencoding::encode(&envio.direccion_destino)),
    }

    url
}

pub fn enlace_para_parada(parada_id: i64, envio: &Envio, origen: Option<Coordenada>) -> EnlaceNavegacion {
    EnlaceNavegacion {
        parada_id,
        url: url_direcciones(envio, origen),
        destino: envio.direccion_destino.clone(),
        con_origen: origen.is_some_and(|o| o.es_valida()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EstadoEnvio;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn envio(destino: Option<(f64, f64)>) -> Envio {
        Envio {
            id: 1,
            direccion_origen: "Depósito".to_string(),
            latitud_origen: None,
            longitud_origen: None,
            direccion_destino: "Av. de Mayo 500, Buenos Aires".to_string(),
            latitud_destino: destino.map(|d| d.0),
            longitud_destino: destino.map(|d| d.1),
            empresa_origen_id: None,
            remitente_cliente_id: None,
            nombre_destinatario: None,
            telefono_destinatario: None,
            repartidor_asignado_id: Some(2),
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
    fn destino_por_coordenadas_con_origen() {
        let url = url_direcciones(&envio(Some((-34.6, -58.4))), Some(Coordenada::new(-34.5, -58.3)));
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&origin=-34.5,-58.3&destination=-34.6,-58.4"
        );
    }

    #[test]
    fn sin_coordenadas_usa_direccion_escapada() {
        let url = url_direcciones(&envio(None), None);
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=Av.%20de%20Mayo%20500%2C%20Buenos%20Aires"
        );
    }

    #[test]
    fn origen_fuera_de_rango_se_omite() {
        let enlace = enlace_para_parada(9, &envio(Some((-34.6, -58.4))), Some(Coordenada::new(120.0, 0.0)));
        assert!(!enlace.con_origen);
        assert!(!enlace.url.contains("origin="));
    }

    #[test]
    fn destino_fuera_de_rango_usa_la_direccion() {
        let url = url_direcciones(&envio(Some((-134.6, -58.4))), None);
        assert!(url.ends_with("&destination=Av.%20de%20Mayo%20500%2C%20Buenos%20Aires"));
        assert!(!url.contains("-134.6"));
    }
}
