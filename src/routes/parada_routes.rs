use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::parada_controller::ParadaController;
use crate::dto::parada_dto::{CambiarEstadoParadaRequest, NavegacionQuery};
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionActual;
use crate::models::ParadaReparto;
use crate::services::navegacion_service::EnlaceNavegacion;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_parada_router() -> Router<AppState> {
    Router::new()
        .route("/paradas/:id/estado", patch(update_estado_parada))
        .route("/paradas/:id/iniciar", post(iniciar_parada))
        .route("/paradas/:id/completar", post(completar_parada))
        .route("/paradas/:id/navegacion", get(navegacion_parada))
}

async fn update_estado_parada(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
    Json(request): Json<CambiarEstadoParadaRequest>,
) -> Result<Json<ApiResponse<ParadaReparto>>, AppError> {
    let controller = ParadaController::new(state);
    Ok(Json(controller.cambiar_estado(&sesion, id, request.estado).await?))
}

async fn iniciar_parada(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ParadaReparto>>, AppError> {
    let controller = ParadaController::new(state);
    Ok(Json(controller.iniciar(&sesion, id).await?))
}

async fn completar_parada(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ParadaReparto>>, AppError> {
    let controller = ParadaController::new(state);
    Ok(Json(controller.completar(&sesion, id).await?))
}

async fn navegacion_parada(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
    Query(query): Query<NavegacionQuery>,
) -> Result<Json<EnlaceNavegacion>, AppError> {
    let controller = ParadaController::new(state);
    Ok(Json(controller.navegacion(&sesion, id, query.origen()).await?))
}
