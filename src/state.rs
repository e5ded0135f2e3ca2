//! Estado compartido de la aplicación
//!
//! Este módulo define el estado compartido que se pasa a través del router
//! de Axum: almacenamiento, configuración, sesiones activas y métricas.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::observability::Metrics;
use crate::repositories::Store;
use crate::utils::jwt::JwtConfig;

/// Sesión del lado del servidor; el JWT sólo vale mientras exista
#[derive(Clone, Debug)]
pub struct Sesion {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl Sesion {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub sesiones: Arc<RwLock<HashMap<Uuid, Sesion>>>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: EnvironmentConfig, metrics: Metrics) -> Self {
        Self {
            store,
            jwt: JwtConfig::from(&config),
            config,
            sesiones: Arc::new(RwLock::new(HashMap::new())),
            metrics,
        }
    }

    pub async fn guardar_sesion(&self, sesion: Sesion) {
        self.sesiones.write().await.insert(sesion.id, sesion);
    }

    /// Sesión vigente; las vencidas se descartan al consultarlas
    pub async fn sesion_vigente(&self, id: Uuid) -> Option<Sesion> {
        let sesion = self.sesiones.read().await.get(&id).cloned()?;
        if sesion.is_expired() {
            self.sesiones.write().await.remove(&id);
            tracing::debug!(sesion_id = %id, "Sesión vencida descartada");
            return None;
        }
        Some(sesion)
    }

    /// Reemplaza una sesión sólo si sigue abierta; un logout concurrente gana
    pub async fn renovar_sesion(&self, renovada: Sesion) -> bool {
        match self.sesiones.write().await.get_mut(&renovada.id) {
            Some(actual) => {
                *actual = renovada;
                true
            }
            None => false,
        }
    }

    pub async fn eliminar_sesion(&self, id: Uuid) -> bool {
        self.sesiones.write().await.remove(&id).is_some()
    }

    /// Limpiar sesiones vencidas; devuelve cuántas se descartaron
    pub async fn limpiar_sesiones_vencidas(&self) -> usize {
        let mut sesiones = self.sesiones.write().await;
        let antes = sesiones.len();
        sesiones.retain(|_, sesion| !sesion.is_expired());
        antes - sesiones.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use chrono::Duration;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            EnvironmentConfig::default(),
            Metrics::new().unwrap(),
        )
    }

    fn sesion(vence_en: Duration) -> Sesion {
        Sesion {
            id: Uuid::new_v4(),
            usuario_id: Uuid::new_v4(),
            expires_at: Utc::now() + vence_en,
        }
    }

    #[tokio::test]
    async fn limpiar_descarta_solo_las_vencidas() {
        let state = state();
        for _ in 0..50 {
            state.guardar_sesion(sesion(Duration::seconds(-5))).await;
        }
        let vigente = sesion(Duration::hours(1));
        state.guardar_sesion(vigente.clone()).await;

        assert_eq!(state.limpiar_sesiones_vencidas().await, 50);
        assert_eq!(state.sesiones.read().await.len(), 1);
        assert!(state.sesion_vigente(vigente.id).await.is_some());
    }

    #[tokio::test]
    async fn renovar_no_revive_una_sesion_cerrada() {
        let state = state();
        let abierta = sesion(Duration::hours(1));
        state.guardar_sesion(abierta.clone()).await;

        let extendida = Sesion {
            expires_at: abierta.expires_at + Duration::hours(1),
            ..abierta.clone()
        };
        assert!(state.renovar_sesion(extendida.clone()).await);
        assert_eq!(
            state.sesion_vigente(abierta.id).await.map(|s| s.expires_at),
            Some(extendida.expires_at)
        );

        assert!(state.eliminar_sesion(abierta.id).await);
        assert!(!state.renovar_sesion(extendida).await);
        assert!(state.sesion_vigente(abierta.id).await.is_none());
    }
}
