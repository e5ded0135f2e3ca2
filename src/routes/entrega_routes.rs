use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::entrega_controller::EntregaController;
use crate::dto::entrega_dto::{CambiarEstadoEntregaRequest, CompletarEntregaRequest, EntregasQuery};
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionActual;
use crate::models::Envio;
use crate::services::estadisticas_service::EstadisticasEntregas;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_entrega_router() -> Router<AppState> {
    Router::new()
        .route("/entregas", get(list_entregas))
        .route("/entregas/estadisticas", get(estadisticas_entregas))
        .route("/entregas/:id/estado", patch(update_estado_entrega))
        .route("/entregas/:id/completar", post(completar_entrega))
}

async fn list_entregas(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Query(query): Query<EntregasQuery>,
) -> Result<Json<Vec<Envio>>, AppError> {
    let controller = EntregaController::new(state);
    Ok(Json(controller.listar(&sesion, &query).await?))
}

async fn estadisticas_entregas(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
) -> Result<Json<EstadisticasEntregas>, AppError> {
    let controller = EntregaController::new(state);
    Ok(Json(controller.estadisticas(&sesion).await?))
}

async fn update_estado_entrega(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
    Json(request): Json<CambiarEstadoEntregaRequest>,
) -> Result<Json<ApiResponse<Envio>>, AppError> {
    let controller = EntregaController::new(state);
    Ok(Json(controller.cambiar_estado(&sesion, id, request.estado).await?))
}

// Sólo el cuerpo vacío es opcional; un JSON mal formado se rechaza
async fn completar_entrega(
    State(state): State<AppState>,
    Extension(SesionActual(sesion)): Extension<SesionActual>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<ApiResponse<Envio>>, AppError> {
    let request = leer_completar(&body)?;
    let controller = EntregaController::new(state);
    Ok(Json(controller.completar(&sesion, id, request).await?))
}

fn leer_completar(body: &[u8]) -> Result<CompletarEntregaRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CompletarEntregaRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Cuerpo de la solicitud inválido: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuerpo_vacio_completa_sin_foto() {
        assert!(leer_completar(b"").unwrap().foto_comprobante.is_none());
        assert!(leer_completar(b"  \n").unwrap().foto_comprobante.is_none());
    }

    #[test]
    fn cuerpo_con_foto() {
        let request = leer_completar(br#"{"foto_comprobante":"https://fotos.rumbo.test/1.jpg"}"#).unwrap();
        assert_eq!(request.foto_comprobante.as_deref(), Some("https://fotos.rumbo.test/1.jpg"));
    }

    #[test]
    fn cuerpo_mal_formado_es_bad_request() {
        assert!(matches!(
            leer_completar(br#"{"foto_comprobante": 123}"#),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(leer_completar(b"{no es json"), Err(AppError::BadRequest(_))));
    }
}
