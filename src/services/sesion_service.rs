//! Credenciales y sesiones
//!
//! Las contraseñas se guardan con bcrypt. Cada inicio de sesión crea una
//! sesión server-side en `AppState` y un JWT que la referencia por `sid`;
//! cerrar la sesión invalida el token aunque no haya vencido.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::state::{AppState, Sesion};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, verify_token};

/// Mensaje único para email o contraseña incorrectos
pub const CREDENCIALES_INVALIDAS: &str = "Email o contraseña incorrectos";

pub fn hashear_password(password: &str, costo: u32) -> AppResult<String> {
    bcrypt::hash(password, costo)
        .map_err(|e| AppError::Hash(format!("Error hasheando contraseña: {}", e)))
}

pub fn verificar_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))
}

/// Token emitido para una sesión
#[derive(Debug, Clone, Serialize)]
pub struct SesionEmitida {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub sesion_id: Uuid,
}

fn emitir(state: &AppState, sesion_id: Uuid, usuario_id: Uuid) -> AppResult<(Sesion, SesionEmitida)> {
    let expires_at = Utc::now() + Duration::seconds(state.jwt.expiration as i64);
    let access_token = generate_token(usuario_id, sesion_id, expires_at, &state.jwt)?;

    let sesion = Sesion {
        id: sesion_id,
        usuario_id,
        expires_at,
    };
    let emitida = SesionEmitida {
        access_token,
        token_type: "Bearer",
        expires_at,
        sesion_id,
    };
    Ok((sesion, emitida))
}

/// Abre una sesión nueva para el usuario
pub async fn abrir_sesion(state: &AppState, usuario_id: Uuid) -> AppResult<SesionEmitida> {
    let (sesion, emitida) = emitir(state, Uuid::new_v4(), usuario_id)?;
    let vencidas = state.limpiar_sesiones_vencidas().await;
    if vencidas > 0 {
        tracing::debug!(vencidas, "Sesiones vencidas descartadas");
    }
    state.guardar_sesion(sesion).await;
    tracing::info!(%usuario_id, sesion_id = %emitida.sesion_id, "🔑 Sesión abierta");
    Ok(emitida)
}

/// Extiende una sesión vigente y emite un token nuevo
pub async fn refrescar_sesion(state: &AppState, sesion: &Sesion) -> AppResult<SesionEmitida> {
    let (renovada, emitida) = emitir(state, sesion.id, sesion.usuario_id)?;
    if !state.renovar_sesion(renovada).await {
        return Err(AppError::Unauthorized("La sesión ya no es válida".to_string()));
    }
    tracing::debug!(sesion_id = %sesion.id, "Sesión renovada");
    Ok(emitida)
}

/// Resuelve el token a una sesión vigente
pub async fn validar_token(state: &AppState, token: &str) -> AppResult<Sesion> {
    let claims = verify_token(token, &state.jwt)
        .map_err(|_| AppError::Unauthorized("Token inválido o expirado".to_string()))?;

    let sesion_id = Uuid::parse_str(&claims.sid)
        .map_err(|_| AppError::Unauthorized("Token inválido o expirado".to_string()))?;

    let sesion = state
        .sesion_vigente(sesion_id)
        .await
        .ok_or_else(|| AppError::Unauthorized("La sesión ya no es válida".to_string()))?;

    if sesion.usuario_id.to_string() != claims.sub {
        return Err(AppError::Unauthorized("Token inválido o expirado".to_string()));
    }
    Ok(sesion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::observability::Metrics;
    use crate::repositories::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            EnvironmentConfig::default(),
            Metrics::new().unwrap(),
        )
    }

    #[test]
    fn hash_y_verificacion() {
        let hash = hashear_password("secreto1", 4).unwrap();
        assert!(verificar_password("secreto1", &hash).unwrap());
        assert!(!verificar_password("otro", &hash).unwrap());
    }

    #[tokio::test]
    async fn token_valido_hasta_cerrar_sesion() {
        let state = state();
        let usuario_id = Uuid::new_v4();
        let emitida = abrir_sesion(&state, usuario_id).await.unwrap();

        let sesion = validar_token(&state, &emitida.access_token).await.unwrap();
        assert_eq!(sesion.usuario_id, usuario_id);

        assert!(state.eliminar_sesion(sesion.id).await);
        assert!(matches!(
            validar_token(&state, &emitida.access_token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn refrescar_extiende_la_misma_sesion() {
        let state = state();
        let emitida = abrir_sesion(&state, Uuid::new_v4()).await.unwrap();
        let sesion = validar_token(&state, &emitida.access_token).await.unwrap();

        let renovada = refrescar_sesion(&state, &sesion).await.unwrap();
        assert_eq!(renovada.sesion_id, sesion.id);
        assert!(renovada.expires_at >= sesion.expires_at);
        assert!(validar_token(&state, &renovada.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn refrescar_tras_logout_no_revive_la_sesion() {
        let state = state();
        let emitida = abrir_sesion(&state, Uuid::new_v4()).await.unwrap();
        let sesion = validar_token(&state, &emitida.access_token).await.unwrap();

        state.eliminar_sesion(sesion.id).await;
        assert!(matches!(
            refrescar_sesion(&state, &sesion).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(state.sesiones.read().await.is_empty());
    }

    #[tokio::test]
    async fn abrir_sesion_descarta_las_vencidas() {
        let state = state();
        for _ in 0..20 {
            state
                .guardar_sesion(Sesion {
                    id: Uuid::new_v4(),
                    usuario_id: Uuid::new_v4(),
                    expires_at: Utc::now() - Duration::seconds(1),
                })
                .await;
        }

        abrir_sesion(&state, Uuid::new_v4()).await.unwrap();
        assert_eq!(state.sesiones.read().await.len(), 1);
    }

    #[tokio::test]
    async fn token_basura_es_no_autorizado() {
        let state = state();
        assert!(matches!(
            validar_token(&state, "no-es-un-jwt").await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
