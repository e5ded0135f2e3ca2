use futures::try_join;

use crate::models::{Cliente, Empresa, Repartidor};
use crate::repositories::CatalogoRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Catálogos del formulario de generación
pub struct CatalogoController {
    state: AppState,
}

impl CatalogoController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn empresas_activas(&self) -> AppResult<Vec<Empresa>> {
        self.state.store.empresas_activas().await
    }

    /// Clientes activos de una empresa existente
    pub async fn clientes_activos(&self, empresa_id: i64) -> AppResult<Vec<Cliente>> {
        let store = &self.state.store;
        let (empresa, clientes) = try_join!(
            store.buscar_empresa(empresa_id),
            store.clientes_activos_de_empresa(empresa_id),
        )?;

        if empresa.is_none() {
            return Err(AppError::NotFound(format!("Empresa {} no encontrada", empresa_id)));
        }
        Ok(clientes)
    }

    pub async fn listar_clientes(&self) -> AppResult<Vec<Cliente>> {
        self.state.store.listar_clientes().await
    }

    pub async fn repartidores_activos(&self) -> AppResult<Vec<Repartidor>> {
        self.state.store.repartidores_activos().await
    }
}
