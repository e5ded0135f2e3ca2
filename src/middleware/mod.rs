//! Middleware del sistema
//!
//! Autenticación por sesión y CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
