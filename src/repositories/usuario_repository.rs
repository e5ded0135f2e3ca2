use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::models::{NuevoUsuario, Usuario};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    /// Crea la cuenta; un email repetido es `Conflict`
    async fn crear_usuario(&self, nuevo: &NuevoUsuario) -> AppResult<Usuario>;

    async fn buscar_usuario_por_email(&self, email: &str) -> AppResult<Option<Usuario>>;

    async fn buscar_usuario(&self, id: Uuid) -> AppResult<Option<Usuario>>;
}

pub(crate) fn email_duplicado() -> AppError {
    AppError::Conflict("El email ya está registrado".to_string())
}

#[async_trait]
impl UsuarioRepository for PgStore {
    async fn crear_usuario(&self, nuevo: &NuevoUsuario) -> AppResult<Usuario> {
        let resultado = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (id, email, nombre, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&nuevo.email)
        .bind(&nuevo.nombre)
        .bind(&nuevo.password_hash)
        .fetch_one(&self.pool)
        .await;

        match resultado {
            Ok(usuario) => Ok(usuario),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(email_duplicado()),
            Err(e) => Err(e.into()),
        }
    }

    async fn buscar_usuario_por_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    async fn buscar_usuario(&self, id: Uuid) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }
}
