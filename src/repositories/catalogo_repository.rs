//! Catálogos: empresas, clientes y repartidores

use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::models::{Cliente, Empresa, EstadoGeneral, Repartidor};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait CatalogoRepository: Send + Sync {
    /// Empresas activas ordenadas por nombre
    async fn empresas_activas(&self) -> AppResult<Vec<Empresa>>;

    async fn buscar_empresa(&self, id: i64) -> AppResult<Option<Empresa>>;

    /// Clientes activos de una empresa ordenados por nombre
    async fn clientes_activos_de_empresa(&self, empresa_id: i64) -> AppResult<Vec<Cliente>>;

    async fn buscar_clientes(&self, ids: &[i64]) -> AppResult<Vec<Cliente>>;

    /// Todos los clientes, los más recientes primero
    async fn listar_clientes(&self) -> AppResult<Vec<Cliente>>;

    async fn repartidores_activos(&self) -> AppResult<Vec<Repartidor>>;

    async fn buscar_repartidor(&self, id: i64) -> AppResult<Option<Repartidor>>;

    async fn repartidor_por_usuario(&self, user_auth_id: Uuid) -> AppResult<Option<Repartidor>>;
}

#[async_trait]
impl CatalogoRepository for PgStore {
    async fn empresas_activas(&self) -> AppResult<Vec<Empresa>> {
        let empresas = sqlx::query_as::<_, Empresa>(
            "SELECT * FROM empresas WHERE estado = $1 ORDER BY nombre",
        )
        .bind(EstadoGeneral::Activo)
        .fetch_all(&self.pool)
        .await?;

        Ok(empresas)
    }

    async fn buscar_empresa(&self, id: i64) -> AppResult<Option<Empresa>> {
        let empresa = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(empresa)
    }

    async fn clientes_activos_de_empresa(&self, empresa_id: i64) -> AppResult<Vec<Cliente>> {
        let clientes = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes WHERE empresa_id = $1 AND estado = $2 ORDER BY nombre",
        )
        .bind(empresa_id)
        .bind(EstadoGeneral::Activo)
        .fetch_all(&self.pool)
        .await?;

        Ok(clientes)
    }

    async fn buscar_clientes(&self, ids: &[i64]) -> AppResult<Vec<Cliente>> {
        let clientes = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(clientes)
    }

    async fn listar_clientes(&self) -> AppResult<Vec<Cliente>> {
        let clientes = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clientes)
    }

    async fn repartidores_activos(&self) -> AppResult<Vec<Repartidor>> {
        let repartidores = sqlx::query_as::<_, Repartidor>(
            "SELECT * FROM repartidores WHERE estado = $1 ORDER BY nombre",
        )
        .bind(EstadoGeneral::Activo)
        .fetch_all(&self.pool)
        .await?;

        Ok(repartidores)
    }

    async fn buscar_repartidor(&self, id: i64) -> AppResult<Option<Repartidor>> {
        let repartidor = sqlx::query_as::<_, Repartidor>("SELECT * FROM repartidores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(repartidor)
    }

    async fn repartidor_por_usuario(&self, user_auth_id: Uuid) -> AppResult<Option<Repartidor>> {
        let repartidor = sqlx::query_as::<_, Repartidor>(
            "SELECT * FROM repartidores WHERE user_auth_id = $1",
        )
        .bind(user_auth_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(repartidor)
    }
}
