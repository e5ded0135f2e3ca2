use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegistroRequest, SesionResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{requerir_sesion, SesionActual};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación; registro y login son públicas
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protegidas = Router::new()
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/sesion", get(sesion))
        .route_layer(from_fn_with_state(state, requerir_sesion));

    Router::new()
        .route("/registro", post(registro))
        .route("/login", post(login))
        .merge(protegidas)
}

async fn registro(
    State(state): State<AppState>,
    Json(request): Json<RegistroRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.registrarse(request).await?;
    Ok(Json(response))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.iniciar_sesion(request).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.refrescar(&sesion).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.cerrar_sesion(&sesion).await?;
    Ok(Json(response))
}

async fn sesion(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
) -> Result<Json<SesionResponse>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.sesion_actual(&sesion).await?;
    Ok(Json(response))
}
