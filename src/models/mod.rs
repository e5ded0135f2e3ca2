//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de repartos, paradas y envíos.

pub mod cliente;
pub mod coordenada;
pub mod empresa;
pub mod envio;
pub mod estado;
pub mod parada;
pub mod reparto;
pub mod repartidor;
pub mod usuario;

pub use cliente::Cliente;
pub use coordenada::Coordenada;
pub use empresa::Empresa;
pub use envio::{CambioEstadoEnvio, Envio, NuevoEnvio};
pub use estado::{EstadoEnvio, EstadoGeneral, EstadoParada, EstadoReparto, MaquinaEstados};
pub use parada::{CambioEstadoParada, NuevaParada, ParadaConEnvio, ParadaReparto};
pub use reparto::{
    CambioEstadoReparto, CriteriosReparto, NuevoReparto, Reparto, RepartoConParadas, RepartoFiltros,
};
pub use repartidor::Repartidor;
pub use usuario::{NuevoUsuario, Usuario};
