//! Cuerpos de request/response de la API

pub mod api_response;
pub mod auth_dto;
pub mod entrega_dto;
pub mod parada_dto;
pub mod reparto_dto;

pub use api_response::ApiResponse;
