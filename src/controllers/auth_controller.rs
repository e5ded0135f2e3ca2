use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegistroRequest, SesionResponse};
use crate::dto::ApiResponse;
use crate::models::{NuevoUsuario, Usuario};
use crate::repositories::{CatalogoRepository, UsuarioRepository};
use crate::services::sesion_service::{
    abrir_sesion, hashear_password, refrescar_sesion, verificar_password, SesionEmitida,
    CREDENCIALES_INVALIDAS,
};
use crate::state::{AppState, Sesion};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::sanitizar_texto;

pub struct AuthController {
    state: AppState,
}

impl AuthController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn registrarse(&self, request: RegistroRequest) -> AppResult<ApiResponse<AuthResponse>> {
        request.validate()?;

        let nuevo = NuevoUsuario {
            email: normalizar_email(&request.email),
            nombre: sanitizar_texto(&request.nombre),
            password_hash: hashear_password(&request.password, self.state.config.bcrypt_cost)?,
        };
        let usuario = self.state.store.crear_usuario(&nuevo).await?;
        info!(usuario_id = %usuario.id, "👤 Cuenta registrada");

        let respuesta = self.responder(usuario).await?;
        Ok(ApiResponse::success_with_message(respuesta, "Cuenta creada exitosamente"))
    }

    pub async fn iniciar_sesion(&self, request: LoginRequest) -> AppResult<ApiResponse<AuthResponse>> {
        request.validate()?;

        let email = normalizar_email(&request.email);
        let Some(usuario) = self.state.store.buscar_usuario_por_email(&email).await? else {
            warn!("Intento de login con email desconocido");
            return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
        };

        if !verificar_password(&request.password, &usuario.password_hash)? {
            warn!(usuario_id = %usuario.id, "Contraseña incorrecta");
            return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
        }

        let respuesta = self.responder(usuario).await?;
        Ok(ApiResponse::success_with_message(respuesta, "Sesión iniciada"))
    }

    pub async fn refrescar(&self, sesion: &Sesion) -> AppResult<ApiResponse<AuthResponse>> {
        let usuario = self.usuario_de(sesion).await?;
        let emitida = refrescar_sesion(&self.state, sesion).await?;
        let respuesta = self.armar(usuario, emitida).await?;
        Ok(ApiResponse::success_with_message(respuesta, "Sesión renovada"))
    }

    pub async fn cerrar_sesion(&self, sesion: &Sesion) -> AppResult<ApiResponse<()>> {
        self.state.eliminar_sesion(sesion.id).await;
        info!(usuario_id = %sesion.usuario_id, sesion_id = %sesion.id, "👋 Sesión cerrada");
        Ok(ApiResponse::message("Sesión cerrada"))
    }

    /// Usuario de la sesión y su perfil de repartidor, si lo tiene
    pub async fn sesion_actual(&self, sesion: &Sesion) -> AppResult<SesionResponse> {
        let usuario = self.usuario_de(sesion).await?;
        let repartidor = self.state.store.repartidor_por_usuario(usuario.id).await?;
        Ok(SesionResponse {
            usuario,
            repartidor,
            expires_at: sesion.expires_at,
        })
    }

    async fn usuario_de(&self, sesion: &Sesion) -> AppResult<Usuario> {
        self.state
            .store
            .buscar_usuario(sesion.usuario_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("La cuenta de la sesión ya no existe".to_string()))
    }

    async fn responder(&self, usuario: Usuario) -> AppResult<AuthResponse> {
        let emitida = abrir_sesion(&self.state, usuario.id).await?;
        self.armar(usuario, emitida).await
    }

    async fn armar(&self, usuario: Usuario, emitida: SesionEmitida) -> AppResult<AuthResponse> {
        let repartidor = self.state.store.repartidor_por_usuario(usuario.id).await?;
        Ok(AuthResponse {
            access_token: emitida.access_token,
            token_type: emitida.token_type,
            expires_at: emitida.expires_at,
            usuario,
            repartidor,
        })
    }
}

fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}
