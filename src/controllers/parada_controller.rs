use tracing::{info, warn};

use super::{hora_actual, repartidor_de_sesion};
use crate::dto::ApiResponse;
use crate::models::{CambioEstadoParada, Coordenada, EstadoParada, MaquinaEstados, ParadaReparto, Repartidor};
use crate::repositories::{EnvioRepository, ParadaRepository, RepartoRepository};
use crate::services::navegacion_service::{enlace_para_parada, EnlaceNavegacion};
use crate::state::{AppState, Sesion};
use crate::utils::errors::{no_autorizado, AppError, AppResult};

pub struct ParadaController {
    state: AppState,
}

impl ParadaController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn cambiar_estado(
        &self,
        sesion: &Sesion,
        id: i64,
        estado: EstadoParada,
    ) -> AppResult<ApiResponse<ParadaReparto>> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let parada = self.parada_propia(&repartidor, id).await?;
        let metrics = &self.state.metrics;

        if let Err(e) = parada.estado_parada.validar_transicion(estado) {
            metrics.transicion(EstadoParada::DOMINIO, false);
            return Err(e.into());
        }

        // Sólo completar estampa la hora real de llegada
        let cambio = CambioEstadoParada {
            estado,
            hora_real_llegada: (estado == EstadoParada::Completado).then(hora_actual),
        };

        let actualizada = self
            .state
            .store
            .actualizar_estado_parada(id, repartidor.id, &cambio)
            .await?
            .ok_or_else(|| no_autorizado("esta parada"))?;

        metrics.transicion(EstadoParada::DOMINIO, true);
        info!(
            parada_id = id,
            reparto_id = actualizada.reparto_id,
            desde = %parada.estado_parada,
            hacia = %estado,
            "📍 Parada actualizada"
        );

        Ok(ApiResponse::success_with_message(
            actualizada,
            format!("Parada actualizada a {}", estado),
        ))
    }

    pub async fn iniciar(&self, sesion: &Sesion, id: i64) -> AppResult<ApiResponse<ParadaReparto>> {
        self.cambiar_estado(sesion, id, EstadoParada::EnProgreso).await
    }

    pub async fn completar(&self, sesion: &Sesion, id: i64) -> AppResult<ApiResponse<ParadaReparto>> {
        self.cambiar_estado(sesion, id, EstadoParada::Completado).await
    }

    /// Enlace de indicaciones hacia la parada desde la posición del repartidor
    pub async fn navegacion(
        &self,
        sesion: &Sesion,
        id: i64,
        origen: Option<Coordenada>,
    ) -> AppResult<EnlaceNavegacion> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let parada = self.parada_propia(&repartidor, id).await?;

        let envio = self
            .state
            .store
            .buscar_envio(parada.envio_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Envío de la parada {} no encontrado", id)))?;

        if origen.is_none() {
            info!(parada_id = id, "Navegación sin ubicación del repartidor");
        }
        Ok(enlace_para_parada(parada.id, &envio, origen))
    }

    /// La parada pertenece al repartidor a través de su reparto
    async fn parada_propia(&self, repartidor: &Repartidor, id: i64) -> AppResult<ParadaReparto> {
        let store = &self.state.store;

        let Some(parada) = store.buscar_parada(id).await? else {
            return Err(self.denegar(repartidor, id));
        };
        match store.buscar_reparto(parada.reparto_id).await? {
            Some(reparto) if reparto.repartidor_id == repartidor.id => Ok(parada),
            _ => Err(self.denegar(repartidor, id)),
        }
    }

    fn denegar(&self, repartidor: &Repartidor, id: i64) -> AppError {
        self.state.metrics.acceso_denegado("parada");
        warn!(parada_id = id, repartidor_id = repartidor.id, "Acceso a parada ajena o inexistente");
        no_autorizado("esta parada")
    }
}
