//! Repartos y su creación atómica junto con paradas y envíos

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::PgStore;
use crate::models::parada::unir_con_envios;
use crate::models::{
    CambioEstadoReparto, Envio, NuevaParada, NuevoEnvio, NuevoReparto, ParadaConEnvio,
    ParadaReparto, Reparto, RepartoConParadas,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait RepartoRepository: Send + Sync {
    /// Repartos de un repartidor, los de fecha más reciente primero
    async fn repartos_de_repartidor(&self, repartidor_id: i64) -> AppResult<Vec<Reparto>>;

    async fn buscar_reparto(&self, id: i64) -> AppResult<Option<Reparto>>;

    /// Paradas (con su envío) de varios repartos, ordenadas por reparto y `orden_visita`
    async fn paradas_de_repartos(&self, reparto_ids: &[i64]) -> AppResult<Vec<ParadaConEnvio>>;

    async fn paradas_de_reparto(&self, reparto_id: i64) -> AppResult<Vec<ParadaConEnvio>> {
        self.paradas_de_repartos(&[reparto_id]).await
    }

    /// Actualiza el estado sólo si el reparto pertenece al repartidor
    async fn actualizar_estado_reparto(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoReparto,
    ) -> AppResult<Option<Reparto>>;

    /// Inserta el reparto, sus envíos y sus paradas como una sola unidad
    async fn crear_reparto_con_paradas(
        &self,
        reparto: &NuevoReparto,
        paradas: &[NuevaParada],
    ) -> AppResult<RepartoConParadas>;
}

#[async_trait]
impl RepartoRepository for PgStore {
    async fn repartos_de_repartidor(&self, repartidor_id: i64) -> AppResult<Vec<Reparto>> {
        let repartos = sqlx::query_as::<_, Reparto>(
            "SELECT * FROM repartos WHERE repartidor_id = $1 ORDER BY fecha_reparto DESC, id DESC",
        )
        .bind(repartidor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(repartos)
    }

    async fn buscar_reparto(&self, id: i64) -> AppResult<Option<Reparto>> {
        let reparto = sqlx::query_as::<_, Reparto>("SELECT * FROM repartos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reparto)
    }

    async fn paradas_de_repartos(&self, reparto_ids: &[i64]) -> AppResult<Vec<ParadaConEnvio>> {
        if reparto_ids.is_empty() {
            return Ok(Vec::new());
        }

        let paradas = sqlx::query_as::<_, ParadaReparto>(
            "SELECT * FROM paradas_reparto WHERE reparto_id = ANY($1) ORDER BY reparto_id, orden_visita",
        )
        .bind(reparto_ids)
        .fetch_all(&self.pool)
        .await?;

        let envio_ids: Vec<i64> = paradas.iter().map(|p| p.envio_id).collect();
        let envios = sqlx::query_as::<_, Envio>("SELECT * FROM envios WHERE id = ANY($1)")
            .bind(&envio_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(unir_con_envios(paradas, envios))
    }

    async fn actualizar_estado_reparto(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoReparto,
    ) -> AppResult<Option<Reparto>> {
        let reparto = sqlx::query_as::<_, Reparto>(
            r#"
            UPDATE repartos
            SET estado = $3,
                hora_inicio = COALESCE($4, hora_inicio),
                hora_fin = COALESCE($5, hora_fin),
                updated_at = now()
            WHERE id = $1 AND repartidor_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(repartidor_id)
        .bind(cambio.estado)
        .bind(cambio.hora_inicio)
        .bind(cambio.hora_fin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reparto)
    }

    async fn crear_reparto_con_paradas(
        &self,
        nuevo: &NuevoReparto,
        paradas: &[NuevaParada],
    ) -> AppResult<RepartoConParadas> {
        let mut tx = self.pool.begin().await?;

        let reparto = sqlx::query_as::<_, Reparto>(
            r#"
            INSERT INTO repartos (fecha_reparto, repartidor_id, empresa_asociada_id, estado, notas)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(nuevo.fecha_reparto)
        .bind(nuevo.repartidor_id)
        .bind(nuevo.empresa_asociada_id)
        .bind(nuevo.estado)
        .bind(&nuevo.notas)
        .fetch_one(&mut *tx)
        .await?;

        let mut creadas = Vec::with_capacity(paradas.len());
        for nueva in paradas {
            let envio = insertar_envio(&mut tx, &nueva.envio).await?;

            let parada = sqlx::query_as::<_, ParadaReparto>(
                r#"
                INSERT INTO paradas_reparto (reparto_id, envio_id, descripcion_parada, orden_visita, estado_parada)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(reparto.id)
            .bind(envio.id)
            .bind(&nueva.descripcion_parada)
            .bind(nueva.orden_visita)
            .bind(nueva.estado_parada)
            .fetch_one(&mut *tx)
            .await?;

            creadas.push(ParadaConEnvio { parada, envio });
        }

        tx.commit().await?;

        Ok(RepartoConParadas {
            reparto,
            paradas: creadas,
        })
    }
}

async fn insertar_envio(tx: &mut Transaction<'_, Postgres>, envio: &NuevoEnvio) -> AppResult<Envio> {
    let creado = sqlx::query_as::<_, Envio>(
        r#"
        INSERT INTO envios (
            direccion_origen, latitud_origen, longitud_origen,
            direccion_destino, latitud_destino, longitud_destino,
            empresa_origen_id, remitente_cliente_id,
            nombre_destinatario, telefono_destinatario, repartidor_asignado_id,
            precio, estado, fecha_estimada_entrega, es_parada_inicio, detalles_adicionales
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(&envio.direccion_origen)
    .bind(envio.origen.map(|c| c.lat))
    .bind(envio.origen.map(|c| c.lng))
    .bind(&envio.direccion_destino)
    .bind(envio.destino.map(|c| c.lat))
    .bind(envio.destino.map(|c| c.lng))
    .bind(envio.empresa_origen_id)
    .bind(envio.remitente_cliente_id)
    .bind(&envio.nombre_destinatario)
    .bind(&envio.telefono_destinatario)
    .bind(envio.repartidor_asignado_id)
    .bind(envio.precio)
    .bind(envio.estado)
    .bind(envio.fecha_estimada_entrega)
    .bind(envio.es_parada_inicio)
    .bind(&envio.detalles_adicionales)
    .fetch_one(&mut **tx)
    .await?;

    Ok(creado)
}
