//! Datos de mapa independientes del proveedor
//!
//! Marcadores, polilínea, límites y zoom para que cualquier widget de mapas
//! dibuje la ruta de un reparto o el resumen de varios repartos.

use std::f64::consts::{LN_2, PI};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Coordenada, EstadoParada, EstadoReparto, ParadaConEnvio, Reparto, RepartoConParadas};

/// Zoom máximo al encuadrar la ruta de un reparto
pub const ZOOM_MAXIMO: u8 = 15;
/// Zoom máximo al encuadrar el resumen de repartos
pub const ZOOM_MAXIMO_RESUMEN: u8 = 16;
/// Zoom cuando no hay puntos que encuadrar
pub const ZOOM_POR_DEFECTO: u8 = 12;

const TAMANO_MUNDO_PX: f64 = 256.0;

/// Tamaño en píxeles del mapa que se va a dibujar
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Viewport {
    #[serde(default = "Viewport::ancho_por_defecto")]
    pub ancho: u32,
    #[serde(default = "Viewport::alto_por_defecto")]
    pub alto: u32,
}

impl Viewport {
    fn ancho_por_defecto() -> u32 {
        800
    }

    fn alto_por_defecto() -> u32 {
        600
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            ancho: Self::ancho_por_defecto(),
            alto: Self::alto_por_defecto(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Limites {
    pub sur: f64,
    pub oeste: f64,
    pub norte: f64,
    pub este: f64,
}

impl Limites {
    pub fn desde_puntos(puntos: &[Coordenada]) -> Option<Self> {
        let (primero, resto) = puntos.split_first()?;
        let inicial = Limites {
            sur: primero.lat,
            oeste: primero.lng,
            norte: primero.lat,
            este: primero.lng,
        };
        Some(resto.iter().fold(inicial, |l, p| Limites {
            sur: l.sur.min(p.lat),
            oeste: l.oeste.min(p.lng),
            norte: l.norte.max(p.lat),
            este: l.este.max(p.lng),
        }))
    }

    pub fn centro(&self) -> Coordenada {
        Coordenada::new((self.sur + self.norte) / 2.0, (self.oeste + self.este) / 2.0)
    }

    /// Mayor zoom (proyección web mercator) en que los límites caben en el viewport
    pub fn zoom_para(&self, viewport: Viewport, maximo: u8) -> u8 {
        fn lat_rad(lat: f64) -> f64 {
            let seno = (lat * PI / 180.0).sin();
            let rad_x2 = ((1.0 + seno) / (1.0 - seno)).ln() / 2.0;
            rad_x2.clamp(-PI, PI) / 2.0
        }

        fn zoom(px: u32, fraccion: f64) -> f64 {
            if fraccion <= 0.0 {
                return f64::INFINITY;
            }
            ((px as f64 / TAMANO_MUNDO_PX / fraccion).ln() / LN_2).floor()
        }

        let fraccion_lat = (lat_rad(self.norte) - lat_rad(self.sur)) / PI;
        let diferencia_lng = self.este - self.oeste;
        let fraccion_lng = (if diferencia_lng < 0.0 { diferencia_lng + 360.0 } else { diferencia_lng }) / 360.0;

        let calculado = zoom(viewport.alto, fraccion_lat).min(zoom(viewport.ancho, fraccion_lng));
        calculado.clamp(0.0, maximo as f64) as u8
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarcadorParada {
    pub parada_id: i64,
    pub posicion: Coordenada,
    pub etiqueta: String,
    pub titulo: String,
    pub direccion: String,
    pub destinatario: Option<String>,
    pub estado: EstadoParada,
    pub color: &'static str,
    pub es_proxima: bool,
    pub es_inicio: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RutaMapa {
    pub reparto_id: i64,
    pub estado: EstadoReparto,
    pub marcadores: Vec<MarcadorParada>,
    pub polilinea: Vec<Coordenada>,
    pub limites: Option<Limites>,
    pub centro: Option<Coordenada>,
    pub zoom: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarcadorReparto {
    pub reparto_id: i64,
    pub posicion: Coordenada,
    pub titulo: String,
    pub fecha_reparto: NaiveDate,
    pub estado: EstadoReparto,
    pub color: &'static str,
    pub total_paradas: usize,
    pub paradas_completadas: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapaRepartos {
    pub marcadores: Vec<MarcadorReparto>,
    pub limites: Option<Limites>,
    pub centro: Option<Coordenada>,
    pub zoom: u8,
}

fn posicion(parada: &ParadaConEnvio) -> Option<Coordenada> {
    parada.envio.destino().filter(Coordenada::es_valida)
}

fn es_pendiente(estado: EstadoParada) -> bool {
    !matches!(estado, EstadoParada::Completado | EstadoParada::Cancelado)
}

fn encuadre(puntos: &[Coordenada], viewport: Viewport, maximo: u8) -> (Option<Limites>, Option<Coordenada>, u8) {
    match Limites::desde_puntos(puntos) {
        Some(limites) => (Some(limites), Some(limites.centro()), limites.zoom_para(viewport, maximo)),
        None => (None, None, ZOOM_POR_DEFECTO.min(maximo)),
    }
}

/// Ruta de un reparto: un marcador por parada con coordenadas, en orden de visita
pub fn ruta_de_reparto(reparto: &Reparto, paradas: &[ParadaConEnvio], viewport: Viewport) -> RutaMapa {
    let mut ordenadas: Vec<&ParadaConEnvio> = paradas.iter().collect();
    ordenadas.sort_by_key(|p| p.parada.orden_visita);

    let proxima = ordenadas
        .iter()
        .find(|p| es_pendiente(p.parada.estado_parada))
        .map(|p| p.parada.id);

    let marcadores: Vec<MarcadorParada> = ordenadas
        .iter()
        .filter_map(|p| {
            let posicion = posicion(p)?;
            let orden = p.parada.orden_visita;
            Some(MarcadorParada {
                parada_id: p.parada.id,
                posicion,
                etiqueta: orden.to_string(),
                titulo: p
                    .parada
                    .descripcion_parada
                    .clone()
                    .unwrap_or_else(|| format!("Parada {}", orden)),
                direccion: p.envio.direccion_destino.clone(),
                destinatario: p.envio.nombre_destinatario.clone(),
                estado: p.parada.estado_parada,
                color: p.parada.estado_parada.color(),
                es_proxima: proxima == Some(p.parada.id),
                es_inicio: p.envio.es_parada_inicio,
            })
        })
        .collect();

    let polilinea: Vec<Coordenada> = marcadores.iter().map(|m| m.posicion).collect();
    let (limites, centro, zoom) = encuadre(&polilinea, viewport, ZOOM_MAXIMO);

    RutaMapa {
        reparto_id: reparto.id,
        estado: reparto.estado,
        marcadores,
        polilinea,
        limites,
        centro,
        zoom,
    }
}

/// Resumen de repartos: un marcador por reparto en su primera parada ubicable
pub fn mapa_de_repartos(repartos: &[RepartoConParadas], viewport: Viewport) -> MapaRepartos {
    let marcadores: Vec<MarcadorReparto> = repartos
        .iter()
        .filter_map(|r| {
            let mut paradas: Vec<&ParadaConEnvio> = r.paradas.iter().collect();
            paradas.sort_by_key(|p| p.parada.orden_visita);
            let posicion = paradas.iter().find_map(|p| posicion(p))?;

            Some(MarcadorReparto {
                reparto_id: r.reparto.id,
                posicion,
                titulo: format!("Reparto #{}", r.reparto.id),
                fecha_reparto: r.reparto.fecha_reparto,
                estado: r.reparto.estado,
                color: r.reparto.estado.color(),
                total_paradas: paradas.len(),
                paradas_completadas: paradas
                    .iter()
                    .filter(|p| p.parada.estado_parada == EstadoParada::Completado)
                    .count(),
            })
        })
        .collect();

    let puntos: Vec<Coordenada> = marcadores.iter().map(|m| m.posicion).collect();
    let (limites, centro, zoom) = encuadre(&puntos, viewport, ZOOM_MAXIMO_RESUMEN);

    MapaRepartos {
        marcadores,
        limites,
        centro,
        zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Envio, EstadoEnvio, ParadaReparto};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn reparto(id: i64, estado: EstadoReparto) -> Reparto {
        Reparto {
            id,
            fecha_reparto: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            repartidor_id: 2,
            empresa_asociada_id: Some(5),
            estado,
            notas: None,
            hora_inicio: None,
            hora_fin: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn parada(id: i64, orden: i32, estado: EstadoParada, destino: Option<(f64, f64)>) -> ParadaConEnvio {
        ParadaConEnvio {
            parada: ParadaReparto {
                id,
                reparto_id: 1,
                envio_id: id,
                descripcion_parada: None,
                orden_visita: orden,
                estado_parada: estado,
                hora_estimada_llegada: None,
                hora_real_llegada: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            envio: Envio {
                id,
                direccion_origen: "Origen".to_string(),
                latitud_origen: None,
                longitud_origen: None,
                direccion_destino: format!("Destino {}", id),
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
                es_parada_inicio: orden == 0,
                detalles_adicionales: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn omite_paradas_sin_coordenadas_y_marca_la_proxima() {
        let paradas = vec![
            parada(3, 2, EstadoParada::Asignado, Some((-34.62, -58.42))),
            parada(1, 0, EstadoParada::Completado, Some((-34.60, -58.38))),
            parada(2, 1, EstadoParada::Asignado, None),
        ];
        let ruta = ruta_de_reparto(&reparto(1, EstadoReparto::EnProgreso), &paradas, Viewport::default());

        let ids: Vec<i64> = ruta.marcadores.iter().map(|m| m.parada_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(ruta.polilinea.len(), 2);
        assert_eq!(ruta.marcadores[0].color, "#10B981");
        assert_eq!(ruta.marcadores[0].titulo, "Parada 0");
        assert!(ruta.marcadores[0].es_inicio);
        // la próxima es la parada 2, que no tiene coordenadas
        assert!(ruta.marcadores.iter().all(|m| !m.es_proxima));
    }

    #[test]
    fn proxima_es_la_primera_pendiente() {
        let paradas = vec![
            parada(1, 0, EstadoParada::Completado, Some((-34.60, -58.38))),
            parada(2, 1, EstadoParada::Cancelado, Some((-34.61, -58.39))),
            parada(3, 2, EstadoParada::EnProgreso, Some((-34.62, -58.40))),
            parada(4, 3, EstadoParada::Asignado, Some((-34.63, -58.41))),
        ];
        let ruta = ruta_de_reparto(&reparto(1, EstadoReparto::EnProgreso), &paradas, Viewport::default());
        let proximas: Vec<i64> = ruta
            .marcadores
            .iter()
            .filter(|m| m.es_proxima)
            .map(|m| m.parada_id)
            .collect();
        assert_eq!(proximas, vec![3]);
        assert_eq!(ruta.marcadores[2].color, "#F59E0B");
    }

    #[test]
    fn zoom_limitado_al_maximo() {
        let un_punto = vec![parada(1, 0, EstadoParada::Asignado, Some((-34.6, -58.4)))];
        let ruta = ruta_de_reparto(&reparto(1, EstadoReparto::Planificado), &un_punto, Viewport::default());
        assert_eq!(ruta.zoom, ZOOM_MAXIMO);
        assert_eq!(ruta.centro, Some(Coordenada::new(-34.6, -58.4)));
    }

    #[test]
    fn zoom_se_aleja_con_puntos_distantes() {
        let cerca = Limites::desde_puntos(&[Coordenada::new(-34.60, -58.40), Coordenada::new(-34.61, -58.41)]).unwrap();
        let lejos = Limites::desde_puntos(&[Coordenada::new(-34.6, -58.4), Coordenada::new(-31.4, -64.2)]).unwrap();

        let z_cerca = cerca.zoom_para(Viewport::default(), 20);
        let z_lejos = lejos.zoom_para(Viewport::default(), 20);
        assert!(z_lejos < z_cerca);
        assert!(z_lejos <= 7);
    }

    #[test]
    fn sin_puntos_no_hay_limites() {
        let ruta = ruta_de_reparto(&reparto(1, EstadoReparto::Planificado), &[], Viewport::default());
        assert!(ruta.limites.is_none());
        assert!(ruta.centro.is_none());
        assert_eq!(ruta.zoom, ZOOM_POR_DEFECTO);
    }

    #[test]
    fn resumen_usa_la_primera_parada_ubicable() {
        let repartos = vec![
            RepartoConParadas {
                reparto: reparto(1, EstadoReparto::Cancelado),
                paradas: vec![
                    parada(2, 1, EstadoParada::Completado, Some((-34.7, -58.5))),
                    parada(1, 0, EstadoParada::Asignado, None),
                ],
            },
            RepartoConParadas {
                reparto: reparto(2, EstadoReparto::Planificado),
                paradas: vec![],
            },
        ];
        let mapa = mapa_de_repartos(&repartos, Viewport::default());

        assert_eq!(mapa.marcadores.len(), 1);
        let marcador = &mapa.marcadores[0];
        assert_eq!(marcador.posicion, Coordenada::new(-34.7, -58.5));
        assert_eq!(marcador.color, "#EF4444");
        assert_eq!(marcador.total_paradas, 2);
        assert_eq!(marcador.paradas_completadas, 1);
        assert_eq!(mapa.zoom, ZOOM_MAXIMO_RESUMEN);
    }
}
