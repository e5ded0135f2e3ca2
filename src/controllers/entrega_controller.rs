use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use super::repartidor_de_sesion;
use crate::dto::entrega_dto::{CompletarEntregaRequest, EntregasQuery};
use crate::dto::ApiResponse;
use crate::models::{CambioEstadoEnvio, Envio, EstadoEnvio, MaquinaEstados};
use crate::repositories::EnvioRepository;
use crate::services::estadisticas_service::{contar_entregas, EstadisticasEntregas};
use crate::state::{AppState, Sesion};
use crate::utils::errors::{no_autorizado, AppError, AppResult};
use crate::utils::validation::sanitizar_opcional;

pub struct EntregaController {
    state: AppState,
}

impl EntregaController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Entregas asignadas al repartidor, las más recientes primero.
    /// Los puntos de partida de los repartos no son entregas.
    pub async fn listar(&self, sesion: &Sesion, query: &EntregasQuery) -> AppResult<Vec<Envio>> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;

        let estado = match query.estado.as_deref().map(str::trim) {
            None | Some("") | Some("todos") => None,
            Some(valor) => Some(valor.parse::<EstadoEnvio>().map_err(|_| {
                AppError::BadRequest(format!("Estado de entrega desconocido: {}", valor))
            })?),
        };

        let envios = self.state.store.envios_de_repartidor(repartidor.id).await?;
        Ok(envios
            .into_iter()
            .filter(|e| !e.es_parada_inicio)
            .filter(|e| estado.map_or(true, |estado| e.estado == estado))
            .collect())
    }

    pub async fn estadisticas(&self, sesion: &Sesion) -> AppResult<EstadisticasEntregas> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let envios = self.state.store.envios_de_repartidor(repartidor.id).await?;
        Ok(contar_entregas(&envios))
    }

    pub async fn cambiar_estado(
        &self,
        sesion: &Sesion,
        id: i64,
        estado: EstadoEnvio,
    ) -> AppResult<ApiResponse<Envio>> {
        self.aplicar(sesion, id, estado, None).await
    }

    /// Marca la entrega como completada, opcionalmente con la URL de la foto
    pub async fn completar(
        &self,
        sesion: &Sesion,
        id: i64,
        request: CompletarEntregaRequest,
    ) -> AppResult<ApiResponse<Envio>> {
        request.validate()?;
        let foto = sanitizar_opcional(request.foto_comprobante.as_deref());
        self.aplicar(sesion, id, EstadoEnvio::Completado, foto).await
    }

    async fn aplicar(
        &self,
        sesion: &Sesion,
        id: i64,
        estado: EstadoEnvio,
        foto_comprobante: Option<String>,
    ) -> AppResult<ApiResponse<Envio>> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let store = &self.state.store;
        let metrics = &self.state.metrics;

        let envio = match store.buscar_envio(id).await? {
            Some(envio) if envio.pertenece_a(repartidor.id) => envio,
            _ => {
                metrics.acceso_denegado("entrega");
                warn!(envio_id = id, repartidor_id = repartidor.id, "Acceso a entrega ajena o inexistente");
                return Err(no_autorizado("esta entrega"));
            }
        };

        if let Err(e) = envio.estado.validar_transicion(estado) {
            metrics.transicion(EstadoEnvio::DOMINIO, false);
            return Err(e.into());
        }

        let completada = estado == EstadoEnvio::Completado;
        let cambio = CambioEstadoEnvio {
            estado,
            fecha_entrega_real: completada.then(Utc::now),
            foto_comprobante: foto_comprobante.filter(|_| completada),
        };

        let actualizado = store
            .actualizar_estado_envio(id, repartidor.id, &cambio)
            .await?
            .ok_or_else(|| no_autorizado("esta entrega"))?;

        metrics.transicion(EstadoEnvio::DOMINIO, true);
        info!(
            envio_id = id,
            desde = %envio.estado,
            hacia = %estado,
            con_foto = actualizado.foto_comprobante.is_some(),
            "📦 Entrega actualizada"
        );

        Ok(ApiResponse::success_with_message(
            actualizado,
            format!("Entrega actualizada a {}", estado),
        ))
    }
}
