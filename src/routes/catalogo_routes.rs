use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::catalogo_controller::CatalogoController;
use crate::models::{Cliente, Empresa, Repartidor};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalogo_router() -> Router<AppState> {
    Router::new()
        .route("/empresas", get(list_empresas))
        .route("/empresas/:id/clientes", get(list_clientes_de_empresa))
        .route("/clientes", get(list_clientes))
        .route("/repartidores", get(list_repartidores))
}

async fn list_empresas(State(state): State<AppState>) -> Result<Json<Vec<Empresa>>, AppError> {
    let controller = CatalogoController::new(state);
    Ok(Json(controller.empresas_activas().await?))
}

async fn list_clientes_de_empresa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    let controller = CatalogoController::new(state);
    Ok(Json(controller.clientes_activos(id).await?))
}

async fn list_clientes(State(state): State<AppState>) -> Result<Json<Vec<Cliente>>, AppError> {
    let controller = CatalogoController::new(state);
    Ok(Json(controller.listar_clientes().await?))
}

async fn list_repartidores(State(state): State<AppState>) -> Result<Json<Vec<Repartidor>>, AppError> {
    let controller = CatalogoController::new(state);
    Ok(Json(controller.repartidores_activos().await?))
}
