//! Middleware de autenticación por sesión
//!
//! Extrae el token Bearer, lo resuelve a una sesión vigente e inyecta
//! `SesionActual` en las extensions del request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::services::sesion_service::validar_token;
use crate::state::{AppState, Sesion};
use crate::utils::errors::AppError;
use crate::utils::jwt::extract_token_from_header;

/// Sesión autenticada que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct SesionActual(pub Sesion);

/// Rechaza con 401 cualquier request sin sesión vigente
pub async fn requerir_sesion(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let sesion = validar_token(&state, token).await?;

    request.extensions_mut().insert(SesionActual(sesion));

    Ok(next.run(request).await)
}
