use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::reparto_controller::RepartoController;
use crate::dto::reparto_dto::{
    CambiarEstadoRepartoRequest, EstadisticasQuery, GenerarRepartoRequest, MapaRutasQuery,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionActual;
use crate::models::{ParadaConEnvio, Reparto, RepartoConParadas, RepartoFiltros};
use crate::services::estadisticas_service::EstadisticasRepartos;
use crate::services::mapa_service::{MapaRepartos, RutaMapa, Viewport};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reparto_router() -> Router<AppState> {
    Router::new()
        .route("/repartos", get(list_repartos))
        .route("/repartos/generar", post(generar_reparto))
        .route("/repartos/estadisticas", get(estadisticas_repartos))
        .route("/repartos/:id", get(get_reparto))
        .route("/repartos/:id/estado", patch(update_estado_reparto))
        .route("/repartos/:id/paradas", get(list_paradas))
        .route("/repartos/:id/mapa", get(mapa_reparto))
        .route("/mapa-rutas", get(mapa_rutas))
}

async fn generar_reparto(
    State(state): State<AppState>,
    Json(request): Json<GenerarRepartoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RepartoConParadas>>), AppError> {
    let controller = RepartoController::new(state);
    let response = controller.generar(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_repartos(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Query(filtros): Query<RepartoFiltros>,
) -> Result<Json<Vec<RepartoConParadas>>, AppError> {
    let controller = RepartoController::new(state);
    Ok(Json(controller.listar(&sesion, &filtros).await?))
}

async fn estadisticas_repartos(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Query(query): Query<EstadisticasQuery>,
) -> Result<Json<EstadisticasRepartos>, AppError> {
    let controller = RepartoController::new(state);
    Ok(Json(controller.estadisticas(&sesion, &query).await?))
}

async fn get_reparto(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
) -> Result<Json<RepartoConParadas>, AppError> {
    let controller = RepartoController::new(state);
    Ok(Json(controller.obtener(&sesion, id).await?))
}

async fn update_estado_reparto(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
    Json(request): Json<CambiarEstadoRepartoRequest>,
) -> Result<Json<ApiResponse<Reparto>>, AppError> {
    let controller = RepartoController::new(state);
    let response = controller.cambiar_estado(&sesion, id, request.estado).await?;
    Ok(Json(response))
}

async fn list_paradas(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ParadaConEnvio>>, AppError> {
    let controller = RepartoController::new(state);
    Ok(Json(controller.paradas(&sesion, id).await?))
}

async fn mapa_reparto(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
    Query(viewport): Query<Viewport>,
) -> Result<Json<RutaMapa>, AppError> {
    let controller = RepartoController::new(state);
    Ok(Json(controller.mapa(&sesion, id, viewport).await?))
}

async fn mapa_rutas(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Query(query): Query<MapaRutasQuery>,
) -> Result<Json<MapaRepartos>, AppError> {
    let controller = RepartoController::new(state);
    Ok(Json(controller.mapa_rutas(&sesion, &query).await?))
}
