//! Rumbo Envíos
//!
//! Gestión de repartos para repartidores: generación de repartos en lote,
//! seguimiento de estados de repartos, paradas y entregas, y datos de mapa.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::crear_app;
