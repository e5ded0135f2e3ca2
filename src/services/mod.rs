//! Servicios de dominio
//!
//! Lógica sin estado HTTP: planificación de repartos, datos de mapa,
//! enlaces de navegación, estadísticas y sesiones.

pub mod estadisticas_service;
pub mod generacion_service;
pub mod mapa_service;
pub mod navegacion_service;
pub mod sesion_service;
