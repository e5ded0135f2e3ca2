//! Estados y máquinas de transición
//!
//! Cada dominio (reparto, parada, envío) comparte la misma forma:
//! asignado/planificado → en progreso → completado | cancelado.
//! Los estados terminales no admiten transiciones salientes.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Estado general de catálogos - mapea al ENUM estado_general_enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "estado_general_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoGeneral {
    Activo,
    Inactivo,
}

/// Estado del reparto - mapea al ENUM estado_reparto_enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "estado_reparto_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoReparto {
    Planificado,
    EnProgreso,
    Completado,
    Cancelado,
}

/// Estado de la parada - mapea al ENUM estado_parada_enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "estado_parada_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoParada {
    Asignado,
    EnProgreso,
    Completado,
    Cancelado,
}

/// Estado del envío - mapea al ENUM estado_envio_enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "estado_envio_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoEnvio {
    PendienteAsignacion,
    Asignado,
    EnProgreso,
    Completado,
    Cancelado,
}

/// Transición rechazada por la tabla de adyacencia
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Transición de estado inválida: {dominio} {desde} → {hacia}")]
pub struct TransicionInvalida {
    pub dominio: &'static str,
    pub desde: String,
    pub hacia: String,
}

/// Tabla de transiciones estática de un dominio de estados
pub trait MaquinaEstados: Copy + PartialEq + fmt::Display + 'static {
    const DOMINIO: &'static str;

    fn transiciones_validas(self) -> &'static [Self];

    fn puede_transicionar_a(self, destino: Self) -> bool {
        self.transiciones_validas().contains(&destino)
    }

    fn es_terminal(self) -> bool {
        self.transiciones_validas().is_empty()
    }

    fn validar_transicion(self, destino: Self) -> Result<(), TransicionInvalida> {
        if self.puede_transicionar_a(destino) {
            Ok(())
        } else {
            Err(TransicionInvalida {
                dominio: Self::DOMINIO,
                desde: self.to_string(),
                hacia: destino.to_string(),
            })
        }
    }
}

impl MaquinaEstados for EstadoReparto {
    const DOMINIO: &'static str = "reparto";

    fn transiciones_validas(self) -> &'static [Self] {
        match self {
            EstadoReparto::Planificado => &[EstadoReparto::EnProgreso, EstadoReparto::Cancelado],
            EstadoReparto::EnProgreso => &[EstadoReparto::Completado, EstadoReparto::Cancelado],
            EstadoReparto::Completado | EstadoReparto::Cancelado => &[],
        }
    }
}

impl MaquinaEstados for EstadoParada {
    const DOMINIO: &'static str = "parada";

    fn transiciones_validas(self) -> &'static [Self] {
        match self {
            EstadoParada::Asignado => &[EstadoParada::EnProgreso, EstadoParada::Cancelado],
            EstadoParada::EnProgreso => &[EstadoParada::Completado, EstadoParada::Cancelado],
            EstadoParada::Completado | EstadoParada::Cancelado => &[],
        }
    }
}

impl MaquinaEstados for EstadoEnvio {
    const DOMINIO: &'static str = "envío";

    fn transiciones_validas(self) -> &'static [Self] {
        match self {
            EstadoEnvio::PendienteAsignacion => &[EstadoEnvio::Asignado, EstadoEnvio::Cancelado],
            EstadoEnvio::Asignado => &[EstadoEnvio::EnProgreso, EstadoEnvio::Cancelado],
            EstadoEnvio::EnProgreso => &[EstadoEnvio::Completado, EstadoEnvio::Cancelado],
            EstadoEnvio::Completado | EstadoEnvio::Cancelado => &[],
        }
    }
}

impl EstadoGeneral {
    pub const TODOS: [EstadoGeneral; 2] = [EstadoGeneral::Activo, EstadoGeneral::Inactivo];

    pub fn as_str(self) -> &'static str {
        match self {
            EstadoGeneral::Activo => "activo",
            EstadoGeneral::Inactivo => "inactivo",
        }
    }
}

impl EstadoReparto {
    pub const TODOS: [EstadoReparto; 4] = [
        EstadoReparto::Planificado,
        EstadoReparto::EnProgreso,
        EstadoReparto::Completado,
        EstadoReparto::Cancelado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EstadoReparto::Planificado => "planificado",
            EstadoReparto::EnProgreso => "en_progreso",
            EstadoReparto::Completado => "completado",
            EstadoReparto::Cancelado => "cancelado",
        }
    }

    /// Color del marcador en el mapa de rutas
    pub fn color(self) -> &'static str {
        match self {
            EstadoReparto::Planificado => "#3B82F6",
            EstadoReparto::EnProgreso => "#F59E0B",
            EstadoReparto::Completado => "#10B981",
            EstadoReparto::Cancelado => "#EF4444",
        }
    }
}

impl EstadoParada {
    pub const TODOS: [EstadoParada; 4] = [
        EstadoParada::Asignado,
        EstadoParada::EnProgreso,
        EstadoParada::Completado,
        EstadoParada::Cancelado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EstadoParada::Asignado => "asignado",
            EstadoParada::EnProgreso => "en_progreso",
            EstadoParada::Completado => "completado",
            EstadoParada::Cancelado => "cancelado",
        }
    }

    /// Color del marcador de la parada
    pub fn color(self) -> &'static str {
        match self {
            EstadoParada::Asignado => "#3B82F6",
            EstadoParada::EnProgreso => "#F59E0B",
            EstadoParada::Completado => "#10B981",
            EstadoParada::Cancelado => "#EF4444",
        }
    }
}

impl EstadoEnvio {
    pub const TODOS: [EstadoEnvio; 5] = [
        EstadoEnvio::PendienteAsignacion,
        EstadoEnvio::Asignado,
        EstadoEnvio::EnProgreso,
        EstadoEnvio::Completado,
        EstadoEnvio::Cancelado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EstadoEnvio::PendienteAsignacion => "pendiente_asignacion",
            EstadoEnvio::Asignado => "asignado",
            EstadoEnvio::EnProgreso => "en_progreso",
            EstadoEnvio::Completado => "completado",
            EstadoEnvio::Cancelado => "cancelado",
        }
    }
}

/// Valor de estado que no pertenece al enum
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Estado desconocido: {0}")]
pub struct EstadoDesconocido(pub String);

macro_rules! impl_texto {
    ($($tipo:ty),*) => {
        $(
            impl fmt::Display for $tipo {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $tipo {
                type Err = EstadoDesconocido;

                fn from_str(valor: &str) -> Result<Self, Self::Err> {
                    <$tipo>::TODOS
                        .into_iter()
                        .find(|estado| estado.as_str() == valor)
                        .ok_or_else(|| EstadoDesconocido(valor.to_string()))
                }
            }
        )*
    };
}

impl_texto!(EstadoGeneral, EstadoReparto, EstadoParada, EstadoEnvio);

#[cfg(test)]
mod tests {
    use super::*;

    const REPARTOS: [EstadoReparto; 4] = EstadoReparto::TODOS;
    const PARADAS: [EstadoParada; 4] = EstadoParada::TODOS;
    const ENVIOS: [EstadoEnvio; 5] = EstadoEnvio::TODOS;

    fn permitida_sii_en_tabla<E: MaquinaEstados + fmt::Debug>(estados: &[E]) {
        for &desde in estados {
            for &hacia in estados {
                let en_tabla = desde.transiciones_validas().contains(&hacia);
                assert_eq!(desde.puede_transicionar_a(hacia), en_tabla, "{desde:?} → {hacia:?}");
                assert_eq!(desde.validar_transicion(hacia).is_ok(), en_tabla);
            }
        }
    }

    #[test]
    fn transicion_permitida_solo_si_esta_en_la_tabla() {
        permitida_sii_en_tabla(&REPARTOS);
        permitida_sii_en_tabla(&PARADAS);
        permitida_sii_en_tabla(&ENVIOS);
    }

    #[test]
    fn estados_terminales_no_admiten_transiciones() {
        for estado in [EstadoReparto::Completado, EstadoReparto::Cancelado] {
            assert!(estado.es_terminal());
            assert!(REPARTOS.iter().all(|&h| !estado.puede_transicionar_a(h)));
        }
        for estado in [EstadoParada::Completado, EstadoParada::Cancelado] {
            assert!(estado.es_terminal());
        }
        for estado in [EstadoEnvio::Completado, EstadoEnvio::Cancelado] {
            assert!(estado.es_terminal());
        }
        assert!(!EstadoReparto::Planificado.es_terminal());
        assert!(!EstadoEnvio::PendienteAsignacion.es_terminal());
    }

    #[test]
    fn tabla_de_reparto() {
        assert!(EstadoReparto::Planificado.puede_transicionar_a(EstadoReparto::EnProgreso));
        assert!(EstadoReparto::Planificado.puede_transicionar_a(EstadoReparto::Cancelado));
        assert!(!EstadoReparto::Planificado.puede_transicionar_a(EstadoReparto::Completado));
        assert!(EstadoReparto::EnProgreso.puede_transicionar_a(EstadoReparto::Completado));
        assert!(!EstadoReparto::EnProgreso.puede_transicionar_a(EstadoReparto::Planificado));
    }

    #[test]
    fn tabla_de_envio_incluye_asignacion() {
        assert!(EstadoEnvio::PendienteAsignacion.puede_transicionar_a(EstadoEnvio::Asignado));
        assert!(!EstadoEnvio::PendienteAsignacion.puede_transicionar_a(EstadoEnvio::EnProgreso));
        assert!(!EstadoEnvio::Asignado.puede_transicionar_a(EstadoEnvio::Completado));
    }

    #[test]
    fn completado_a_en_progreso_es_rechazado() {
        let err = EstadoReparto::Completado
            .validar_transicion(EstadoReparto::EnProgreso)
            .unwrap_err();
        assert_eq!(err.dominio, "reparto");
        assert_eq!(err.desde, "completado");
        assert_eq!(err.hacia, "en_progreso");
        assert!(err.to_string().starts_with("Transición de estado inválida"));
    }

    #[test]
    fn texto_ida_y_vuelta() {
        for estado in EstadoEnvio::TODOS {
            assert_eq!(estado.as_str().parse::<EstadoEnvio>(), Ok(estado));
        }
        assert!("entregado".parse::<EstadoParada>().is_err());
    }

    #[test]
    fn serializa_en_snake_case() {
        assert_eq!(
            serde_json::to_string(&EstadoEnvio::PendienteAsignacion).unwrap(),
            "\"pendiente_asignacion\""
        );
        let estado: EstadoReparto = serde_json::from_str("\"en_progreso\"").unwrap();
        assert_eq!(estado, EstadoReparto::EnProgreso);
    }
}
