use serde::Deserialize;
use validator::Validate;

use crate::models::{EstadoReparto, RepartoFiltros};
use crate::services::mapa_service::Viewport;

// Request del formulario de generación; los campos ausentes se informan juntos
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerarRepartoRequest {
    pub fecha: Option<String>,
    pub empresa_id: Option<i64>,
    pub repartidor_id: Option<i64>,
    #[serde(default)]
    pub clientes: Vec<i64>,
    #[validate(length(max = 1000, message = "Notas demasiado largas"))]
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CambiarEstadoRepartoRequest {
    pub estado: EstadoReparto,
}

#[derive(Debug, Default, Deserialize)]
pub struct EstadisticasQuery {
    /// `YYYY-MM-DD` o `hoy`; por defecto hoy
    pub fecha: Option<String>,
}

// Filtros del mapa de rutas más el tamaño del mapa
#[derive(Debug, Default, Deserialize)]
pub struct MapaRutasQuery {
    pub fecha: Option<String>,
    pub estado: Option<String>,
    pub busqueda: Option<String>,
    pub ancho: Option<u32>,
    pub alto: Option<u32>,
}

impl MapaRutasQuery {
    pub fn filtros(&self) -> RepartoFiltros {
        RepartoFiltros {
            fecha: self.fecha.clone(),
            estado: self.estado.clone(),
            busqueda: self.busqueda.clone(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        let defecto = Viewport::default();
        Viewport {
            ancho: self.ancho.unwrap_or(defecto.ancho),
            alto: self.alto.unwrap_or(defecto.alto),
        }
    }
}
