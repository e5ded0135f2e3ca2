use async_trait::async_trait;

use super::PgStore;
use crate::models::{CambioEstadoEnvio, Envio};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait EnvioRepository: Send + Sync {
    /// Envíos asignados al repartidor, los más recientes primero
    async fn envios_de_repartidor(&self, repartidor_id: i64) -> AppResult<Vec<Envio>>;

    async fn buscar_envio(&self, id: i64) -> AppResult<Option<Envio>>;

    /// Actualiza sólo si el envío está asignado al repartidor
    async fn actualizar_estado_envio(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoEnvio,
    ) -> AppResult<Option<Envio>>;
}

#[async_trait]
impl EnvioRepository for PgStore {
    async fn envios_de_repartidor(&self, repartidor_id: i64) -> AppResult<Vec<Envio>> {
        let envios = sqlx::query_as::<_, Envio>(
            "SELECT * FROM envios WHERE repartidor_asignado_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(repartidor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(envios)
    }

    async fn buscar_envio(&self, id: i64) -> AppResult<Option<Envio>> {
        let envio = sqlx::query_as::<_, Envio>("SELECT * FROM envios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(envio)
    }

    async fn actualizar_estado_envio(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoEnvio,
    ) -> AppResult<Option<Envio>> {
        let envio = sqlx::query_as::<_, Envio>(
            r#"
            UPDATE envios
            SET estado = $3,
                fecha_entrega_real = COALESCE($4, fecha_entrega_real),
                foto_comprobante = COALESCE($5, foto_comprobante),
                updated_at = now()
            WHERE id = $1 AND repartidor_asignado_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(repartidor_id)
        .bind(cambio.estado)
        .bind(cambio.fecha_entrega_real)
        .bind(&cambio.foto_comprobante)
        .fetch_optional(&self.pool)
        .await?;

        Ok(envio)
    }
}
