use serde::Deserialize;

use crate::models::{Coordenada, EstadoParada};

#[derive(Debug, Deserialize)]
pub struct CambiarEstadoParadaRequest {
    pub estado: EstadoParada,
}

// Posición actual del repartidor; ausente si no concedió la geolocalización
#[derive(Debug, Default, Deserialize)]
pub struct NavegacionQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl NavegacionQuery {
    pub fn origen(&self) -> Option<Coordenada> {
        Coordenada::desde_columnas(self.lat, self.lng)
    }
}
