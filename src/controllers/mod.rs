//! Controladores
//!
//! Orquestan cada caso de uso: resuelven el repartidor de la sesión,
//! comprueban la propiedad del recurso y validan las transiciones antes
//! de escribir.

pub mod auth_controller;
pub mod catalogo_controller;
pub mod entrega_controller;
pub mod parada_controller;
pub mod reparto_controller;

use chrono::{Local, NaiveDate, NaiveTime, Timelike};

use crate::models::Repartidor;
use crate::repositories::CatalogoRepository;
use crate::state::{AppState, Sesion};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::parse_fecha;

/// Repartidor enlazado a la cuenta de la sesión
pub(crate) async fn repartidor_de_sesion(state: &AppState, sesion: &Sesion) -> AppResult<Repartidor> {
    state
        .store
        .repartidor_por_usuario(sesion.usuario_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Perfil de repartidor no encontrado".to_string()))
}

/// Hora local del servidor con precisión de segundos
pub(crate) fn hora_actual() -> NaiveTime {
    let ahora = Local::now().time();
    ahora.with_nanosecond(0).unwrap_or(ahora)
}

pub(crate) fn hoy() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD`, `hoy` o ausente (hoy)
pub(crate) fn fecha_o_hoy(fecha: Option<&str>) -> AppResult<NaiveDate> {
    match fecha.map(str::trim) {
        None | Some("") | Some("hoy") => Ok(hoy()),
        Some(valor) => parse_fecha(valor),
    }
}
