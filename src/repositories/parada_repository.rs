use async_trait::async_trait;

use super::PgStore;
use crate::models::{CambioEstadoParada, ParadaReparto};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ParadaRepository: Send + Sync {
    async fn buscar_parada(&self, id: i64) -> AppResult<Option<ParadaReparto>>;

    /// Actualiza sólo si el reparto de la parada pertenece al repartidor
    async fn actualizar_estado_parada(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoParada,
    ) -> AppResult<Option<ParadaReparto>>;
}

#[async_trait]
impl ParadaRepository for PgStore {
    async fn buscar_parada(&self, id: i64) -> AppResult<Option<ParadaReparto>> {
        let parada = sqlx::query_as::<_, ParadaReparto>("SELECT * FROM paradas_reparto WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(parada)
    }

    async fn actualizar_estado_parada(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoParada,
    ) -> AppResult<Option<ParadaReparto>> {
        let parada = sqlx::query_as::<_, ParadaReparto>(
            r#"
            UPDATE paradas_reparto AS p
            SET estado_parada = $3,
                hora_real_llegada = COALESCE($4, p.hora_real_llegada),
                updated_at = now()
            FROM repartos AS r
            WHERE p.id = $1 AND r.id = p.reparto_id AND r.repartidor_id = $2
            RETURNING p.*
            "#,
        )
        .bind(id)
        .bind(repartidor_id)
        .bind(cambio.estado)
        .bind(cambio.hora_real_llegada)
        .fetch_optional(&self.pool)
        .await?;

        Ok(parada)
    }
}
