//! Modelo de Reparto
//!
//! Un reparto es el lote de entregas de un repartidor para una fecha.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{EstadoReparto, ParadaConEnvio};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::parse_fecha;

/// Reparto - mapea exactamente a la tabla repartos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reparto {
    pub id: i64,
    pub fecha_reparto: NaiveDate,
    pub repartidor_id: i64,
    pub empresa_asociada_id: Option<i64>,
    pub estado: EstadoReparto,
    pub notas: Option<String>,
    pub hora_inicio: Option<NaiveTime>,
    pub hora_fin: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reparto con sus paradas ordenadas por `orden_visita`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepartoConParadas {
    #[serde(flatten)]
    pub reparto: Reparto,
    pub paradas: Vec<ParadaConEnvio>,
}

impl RepartoConParadas {
    /// Reparte las paradas entre sus repartos conservando el orden de `repartos`
    pub fn agrupar(repartos: Vec<Reparto>, paradas: Vec<ParadaConEnvio>) -> Vec<Self> {
        let mut por_reparto: HashMap<i64, Vec<ParadaConEnvio>> = HashMap::new();
        for parada in paradas {
            por_reparto.entry(parada.parada.reparto_id).or_default().push(parada);
        }

        repartos
            .into_iter()
            .map(|reparto| {
                let mut paradas = por_reparto.remove(&reparto.id).unwrap_or_default();
                paradas.sort_by_key(|p| p.parada.orden_visita);
                RepartoConParadas { reparto, paradas }
            })
            .collect()
    }
}

/// Datos de inserción de un reparto
#[derive(Debug, Clone, PartialEq)]
pub struct NuevoReparto {
    pub fecha_reparto: NaiveDate,
    pub repartidor_id: i64,
    pub empresa_asociada_id: Option<i64>,
    pub estado: EstadoReparto,
    pub notas: Option<String>,
}

/// Cambio de estado ya validado, con las horas que estampa
#[derive(Debug, Clone)]
pub struct CambioEstadoReparto {
    pub estado: EstadoReparto,
    pub hora_inicio: Option<NaiveTime>,
    pub hora_fin: Option<NaiveTime>,
}

/// Filtros del listado de repartos (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepartoFiltros {
    /// `YYYY-MM-DD` o `hoy`
    pub fecha: Option<String>,
    /// Estado concreto o `todos`
    pub estado: Option<String>,
    /// Coincide con el id o con parte de la fecha
    pub busqueda: Option<String>,
}

/// Filtros ya interpretados
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriosReparto {
    pub fecha: Option<NaiveDate>,
    pub estado: Option<EstadoReparto>,
    pub busqueda: Option<String>,
}

impl RepartoFiltros {
    pub fn resolver(&self, hoy: NaiveDate) -> AppResult<CriteriosReparto> {
        let fecha = match self.fecha.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("hoy") => Some(hoy),
            Some(valor) => Some(parse_fecha(valor)?),
        };

        let estado = match self.estado.as_deref().map(str::trim) {
            None | Some("") | Some("todos") => None,
            Some(valor) => Some(valor.parse::<EstadoReparto>().map_err(|_| {
                AppError::BadRequest(format!("Estado de reparto desconocido: {}", valor))
            })?),
        };

        let busqueda = self
            .busqueda
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_lowercase);

        Ok(CriteriosReparto { fecha, estado, busqueda })
    }
}

impl CriteriosReparto {
    pub fn coincide(&self, reparto: &Reparto) -> bool {
        if let Some(fecha) = self.fecha {
            if reparto.fecha_reparto != fecha {
                return false;
            }
        }
        if let Some(estado) = self.estado {
            if reparto.estado != estado {
                return false;
            }
        }
        if let Some(busqueda) = &self.busqueda {
            let id = reparto.id.to_string();
            let fecha = reparto.fecha_reparto.format("%Y-%m-%d").to_string();
            if !id.contains(busqueda.as_str()) && !fecha.contains(busqueda.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn aplicar(&self, repartos: Vec<Reparto>) -> Vec<Reparto> {
        repartos.into_iter().filter(|r| self.coincide(r)).collect()
    }
}
