use tracing::{info, warn};
use validator::Validate;

use super::{fecha_o_hoy, hora_actual, hoy, repartidor_de_sesion};
use crate::dto::reparto_dto::{EstadisticasQuery, GenerarRepartoRequest, MapaRutasQuery};
use crate::dto::ApiResponse;
use crate::models::{
    CambioEstadoReparto, EstadoReparto, MaquinaEstados, ParadaConEnvio, Reparto, RepartoConParadas,
    RepartoFiltros, Repartidor,
};
use crate::repositories::{CatalogoRepository, RepartoRepository};
use crate::services::estadisticas_service::{contar_repartos, EstadisticasRepartos};
use crate::services::generacion_service::{
    mensaje_exito, planificar_reparto, validar_seleccion, MENSAJE_CAMPOS_REQUERIDOS,
};
use crate::services::mapa_service::{mapa_de_repartos, ruta_de_reparto, MapaRepartos, RutaMapa, Viewport};
use crate::state::{AppState, Sesion};
use crate::utils::errors::{no_autorizado, AppError, AppResult};
use crate::utils::validation::parse_fecha;

const NO_ENCONTRADO: &str = "Reparto no encontrado o no autorizado";

pub struct RepartoController {
    state: AppState,
}

impl RepartoController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Genera un reparto completo y lo persiste de una sola vez
    pub async fn generar(
        &self,
        request: GenerarRepartoRequest,
    ) -> AppResult<ApiResponse<RepartoConParadas>> {
        request.validate()?;

        let fecha = request.fecha.as_deref().map(str::trim).filter(|f| !f.is_empty());
        let (Some(fecha), Some(empresa_id), Some(repartidor_id)) =
            (fecha, request.empresa_id, request.repartidor_id)
        else {
            return Err(AppError::BadRequest(MENSAJE_CAMPOS_REQUERIDOS.to_string()));
        };
        if request.clientes.is_empty() {
            return Err(AppError::BadRequest(MENSAJE_CAMPOS_REQUERIDOS.to_string()));
        }
        let fecha = parse_fecha(fecha)?;

        let store = &self.state.store;
        let (empresa, repartidor, encontrados) = futures::try_join!(
            store.buscar_empresa(empresa_id),
            store.buscar_repartidor(repartidor_id),
            store.buscar_clientes(&request.clientes),
        )?;

        let empresa = empresa
            .ok_or_else(|| AppError::NotFound(format!("Empresa {} no encontrada", empresa_id)))?;
        let repartidor = repartidor
            .ok_or_else(|| AppError::NotFound(format!("Repartidor {} no encontrado", repartidor_id)))?;

        let clientes = validar_seleccion(&empresa, &repartidor, &request.clientes, encontrados)?;
        let plan = planificar_reparto(&empresa, repartidor.id, fecha, &clientes, request.notas.as_deref());

        let creado = store
            .crear_reparto_con_paradas(&plan.reparto, &plan.paradas)
            .await
            .map_err(|e| {
                warn!(empresa_id, repartidor_id, error = %e, "❌ No se pudo persistir el reparto");
                e
            })?;

        let total_paradas = creado.paradas.len();
        self.state.metrics.repartos_generados_total.inc();
        self.state
            .metrics
            .paradas_generadas_total
            .inc_by(total_paradas as u64);

        info!(
            reparto_id = creado.reparto.id,
            empresa_id,
            repartidor_id,
            %fecha,
            paradas = total_paradas,
            "🚚 Reparto generado"
        );

        Ok(ApiResponse::success_with_message(creado, mensaje_exito(total_paradas)))
    }

    /// Repartos del repartidor con sus paradas, filtrados
    pub async fn listar(&self, sesion: &Sesion, filtros: &RepartoFiltros) -> AppResult<Vec<RepartoConParadas>> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let criterios = filtros.resolver(hoy())?;

        let repartos = criterios.aplicar(self.state.store.repartos_de_repartidor(repartidor.id).await?);
        let ids: Vec<i64> = repartos.iter().map(|r| r.id).collect();
        let paradas = self.state.store.paradas_de_repartos(&ids).await?;

        Ok(RepartoConParadas::agrupar(repartos, paradas))
    }

    pub async fn obtener(&self, sesion: &Sesion, id: i64) -> AppResult<RepartoConParadas> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let reparto = self.reparto_propio(&repartidor, id).await?;
        let paradas = self.state.store.paradas_de_reparto(reparto.id).await?;

        Ok(RepartoConParadas { reparto, paradas })
    }

    pub async fn paradas(&self, sesion: &Sesion, id: i64) -> AppResult<Vec<ParadaConEnvio>> {
        Ok(self.obtener(sesion, id).await?.paradas)
    }

    pub async fn cambiar_estado(
        &self,
        sesion: &Sesion,
        id: i64,
        estado: EstadoReparto,
    ) -> AppResult<ApiResponse<Reparto>> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let store = &self.state.store;
        let metrics = &self.state.metrics;

        let reparto = match store.buscar_reparto(id).await? {
            Some(reparto) if reparto.repartidor_id == repartidor.id => reparto,
            _ => {
                metrics.acceso_denegado("reparto");
                warn!(reparto_id = id, repartidor_id = repartidor.id, "Cambio de estado sobre reparto ajeno");
                return Err(no_autorizado("este reparto"));
            }
        };

        if let Err(e) = reparto.estado.validar_transicion(estado) {
            metrics.transicion(EstadoReparto::DOMINIO, false);
            return Err(e.into());
        }

        let cambio = CambioEstadoReparto {
            estado,
            hora_inicio: (estado == EstadoReparto::EnProgreso).then(hora_actual),
            hora_fin: (estado == EstadoReparto::Completado).then(hora_actual),
        };

        let actualizado = store
            .actualizar_estado_reparto(id, repartidor.id, &cambio)
            .await?
            .ok_or_else(|| no_autorizado("este reparto"))?;

        metrics.transicion(EstadoReparto::DOMINIO, true);
        info!(reparto_id = id, desde = %reparto.estado, hacia = %estado, "Reparto actualizado");

        Ok(ApiResponse::success_with_message(
            actualizado,
            format!("Reparto actualizado a {}", estado),
        ))
    }

    /// Conteo por estado de los repartos de una fecha (hoy por defecto)
    pub async fn estadisticas(&self, sesion: &Sesion, query: &EstadisticasQuery) -> AppResult<EstadisticasRepartos> {
        let repartidor = repartidor_de_sesion(&self.state, sesion).await?;
        let fecha = fecha_o_hoy(query.fecha.as_deref())?;

        let repartos = self.state.store.repartos_de_repartidor(repartidor.id).await?;
        Ok(contar_repartos(repartos.iter().filter(|r| r.fecha_reparto == fecha)))
    }

    pub async fn mapa(&self, sesion: &Sesion, id: i64, viewport: Viewport) -> AppResult<RutaMapa> {
        let con_paradas = self.obtener(sesion, id).await?;
        Ok(ruta_de_reparto(&con_paradas.reparto, &con_paradas.paradas, viewport))
    }

    pub async fn mapa_rutas(&self, sesion: &Sesion, query: &MapaRutasQuery) -> AppResult<MapaRepartos> {
        let repartos = self.listar(sesion, &query.filtros()).await?;
        Ok(mapa_de_repartos(&repartos, query.viewport()))
    }

    async fn reparto_propio(&self, repartidor: &Repartidor, id: i64) -> AppResult<Reparto> {
        match self.state.store.buscar_reparto(id).await? {
            Some(reparto) if reparto.repartidor_id == repartidor.id => Ok(reparto),
            Some(_) => {
                self.state.metrics.acceso_denegado("reparto");
                Err(AppError::NotFound(NO_ENCONTRADO.to_string()))
            }
            None => Err(AppError::NotFound(NO_ENCONTRADO.to_string())),
        }
    }
}
