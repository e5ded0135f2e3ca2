use serde::{Deserialize, Serialize};

/// Punto geográfico en grados decimales
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordenada {
    pub lat: f64,
    pub lng: f64,
}

impl Coordenada {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Combina columnas latitud/longitud opcionales; sólo hay punto si existen ambas
    pub fn desde_columnas(latitud: Option<f64>, longitud: Option<f64>) -> Option<Self> {
        match (latitud, longitud) {
            (Some(lat), Some(lng)) => Some(Self { lat, lng }),
            _ => None,
        }
    }

    pub fn es_valida(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requiere_ambas_columnas() {
        assert!(Coordenada::desde_columnas(Some(-34.6), None).is_none());
        assert_eq!(
            Coordenada::desde_columnas(Some(-34.6), Some(-58.4)),
            Some(Coordenada::new(-34.6, -58.4))
        );
    }

    #[test]
    fn valida_rangos() {
        assert!(Coordenada::new(-34.6, -58.4).es_valida());
        assert!(!Coordenada::new(91.0, 0.0).es_valida());
    }
}
