use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use rumbo_envios::config::{DatabaseConfig, EnvironmentConfig};
use rumbo_envios::crear_app;
use rumbo_envios::database::conectar;
use rumbo_envios::observability::Metrics;
use rumbo_envios::repositories::semilla::Semilla;
use rumbo_envios::repositories::{MemoryStore, PgStore, Store};
use rumbo_envios::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let nivel = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(nivel).init();

    info!("🚚 Rumbo Envíos - Gestión de repartos");
    info!(environment = %config.environment, "================================================");

    let store = crear_store(&config).await?;
    let metrics = Metrics::new()?;
    let app = crear_app(AppState::new(store, config.clone(), metrics));

    let addr = config.server_url();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Servidor iniciando en http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// PostgreSQL si hay `DATABASE_URL`; si no, memoria con semilla opcional
async fn crear_store(config: &EnvironmentConfig) -> Result<Arc<dyn Store>> {
    if let Some(db_config) = DatabaseConfig::from_environment(config) {
        let pool = conectar(&db_config).await?;
        info!("✅ Almacenamiento PostgreSQL listo");
        return Ok(Arc::new(PgStore::new(pool)));
    }

    if config.is_production() {
        warn!("⚠️ Producción sin DATABASE_URL: los datos se pierden al reiniciar");
    }

    let store = MemoryStore::new();
    if let Some(ruta) = &config.seed_file {
        let semilla = Semilla::desde_archivo(ruta)?;
        semilla.aplicar(&store, config.bcrypt_cost).await?;
    }
    info!("✅ Almacenamiento en memoria listo");
    Ok(Arc::new(store))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut senal) => {
                senal.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
