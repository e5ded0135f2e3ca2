//! Rutas HTTP
//!
//! Todo lo que cuelga de `/api` exige sesión, salvo registro y login.

pub mod auth_routes;
pub mod catalogo_routes;
pub mod entrega_routes;
pub mod parada_routes;
pub mod reparto_routes;
pub mod sistema_routes;

use axum::{middleware::from_fn_with_state, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth::requerir_sesion, cors::cors_desde_config};
use crate::state::AppState;

/// Router completo de la aplicación con sus capas
pub fn crear_app(state: AppState) -> Router {
    let protegidas = Router::new()
        .merge(catalogo_routes::create_catalogo_router())
        .merge(reparto_routes::create_reparto_router())
        .merge(parada_routes::create_parada_router())
        .merge(entrega_routes::create_entrega_router())
        .route_layer(from_fn_with_state(state.clone(), requerir_sesion));

    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .merge(protegidas);

    Router::new()
        .merge(sistema_routes::create_sistema_router())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_desde_config(&state.config.cors_origins))
        .with_state(state)
}
