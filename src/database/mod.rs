//! Acceso a la base de datos
//!
//! Este módulo maneja la conexión a PostgreSQL y sus migraciones.

pub mod connection;

pub use connection::conectar;
