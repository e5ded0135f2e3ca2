//! Almacenamiento en memoria
//!
//! Todas las tablas viven detrás de un único `RwLock`, de modo que la
//! creación de un reparto con sus paradas ocurre bajo un solo candado de
//! escritura y ningún lector observa un lote a medias.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::usuario_repository::email_duplicado;
use super::{CatalogoRepository, EnvioRepository, ParadaRepository, RepartoRepository, UsuarioRepository};
use crate::models::parada::unir_con_envios;
use crate::models::{
    CambioEstadoEnvio, CambioEstadoParada, CambioEstadoReparto, Cliente, Empresa, Envio,
    EstadoGeneral, NuevaParada, NuevoEnvio, NuevoReparto, NuevoUsuario, ParadaConEnvio,
    ParadaReparto, Reparto, RepartoConParadas, Repartidor, Usuario,
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Tablas {
    empresas: BTreeMap<i64, Empresa>,
    clientes: BTreeMap<i64, Cliente>,
    repartidores: BTreeMap<i64, Repartidor>,
    usuarios: HashMap<Uuid, Usuario>,
    envios: BTreeMap<i64, Envio>,
    repartos: BTreeMap<i64, Reparto>,
    paradas: BTreeMap<i64, ParadaReparto>,
}

fn siguiente_id<T>(tabla: &BTreeMap<i64, T>) -> i64 {
    tabla.keys().next_back().map_or(1, |id| id + 1)
}

/// Almacenamiento en memoria del proceso (demos y tests)
#[derive(Default)]
pub struct MemoryStore {
    tablas: RwLock<Tablas>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o reemplaza una empresa; `id = 0` asigna el siguiente
    pub async fn agregar_empresa(&self, mut empresa: Empresa) -> Empresa {
        let mut tablas = self.tablas.write().await;
        if empresa.id == 0 {
            empresa.id = siguiente_id(&tablas.empresas);
        }
        tablas.empresas.insert(empresa.id, empresa.clone());
        empresa
    }

    /// Inserta o reemplaza un cliente; `id = 0` asigna el siguiente
    pub async fn agregar_cliente(&self, mut cliente: Cliente) -> Cliente {
        let mut tablas = self.tablas.write().await;
        if cliente.id == 0 {
            cliente.id = siguiente_id(&tablas.clientes);
        }
        tablas.clientes.insert(cliente.id, cliente.clone());
        cliente
    }

    /// Inserta o reemplaza un repartidor; `id = 0` asigna el siguiente
    pub async fn agregar_repartidor(&self, mut repartidor: Repartidor) -> Repartidor {
        let mut tablas = self.tablas.write().await;
        if repartidor.id == 0 {
            repartidor.id = siguiente_id(&tablas.repartidores);
        }
        tablas.repartidores.insert(repartidor.id, repartidor.clone());
        repartidor
    }
}

fn envio_desde(id: i64, nuevo: &NuevoEnvio) -> Envio {
    let ahora = Utc::now();
    Envio {
        id,
        direccion_origen: nuevo.direccion_origen.clone(),
        latitud_origen: nuevo.origen.map(|c| c.lat),
        longitud_origen: nuevo.origen.map(|c| c.lng),
        direccion_destino: nuevo.direccion_destino.clone(),
        latitud_destino: nuevo.destino.map(|c| c.lat),
        longitud_destino: nuevo.destino.map(|c| c.lng),
        empresa_origen_id: nuevo.empresa_origen_id,
        remitente_cliente_id: nuevo.remitente_cliente_id,
        nombre_destinatario: nuevo.nombre_destinatario.clone(),
        telefono_destinatario: nuevo.telefono_destinatario.clone(),
        repartidor_asignado_id: nuevo.repartidor_asignado_id,
        precio: nuevo.precio,
        estado: nuevo.estado,
        fecha_estimada_entrega: nuevo.fecha_estimada_entrega,
        fecha_entrega_real: None,
        foto_comprobante: None,
        es_parada_inicio: nuevo.es_parada_inicio,
        detalles_adicionales: nuevo.detalles_adicionales.clone(),
        created_at: ahora,
        updated_at: ahora,
    }
}

#[async_trait]
impl CatalogoRepository for MemoryStore {
    async fn empresas_activas(&self) -> AppResult<Vec<Empresa>> {
        let tablas = self.tablas.read().await;
        let mut empresas: Vec<Empresa> = tablas
            .empresas
            .values()
            .filter(|e| e.esta_activa())
            .cloned()
            .collect();
        empresas.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(empresas)
    }

    async fn buscar_empresa(&self, id: i64) -> AppResult<Option<Empresa>> {
        Ok(self.tablas.read().await.empresas.get(&id).cloned())
    }

    async fn clientes_activos_de_empresa(&self, empresa_id: i64) -> AppResult<Vec<Cliente>> {
        let tablas = self.tablas.read().await;
        let mut clientes: Vec<Cliente> = tablas
            .clientes
            .values()
            .filter(|c| c.empresa_id == Some(empresa_id) && c.estado == EstadoGeneral::Activo)
            .cloned()
            .collect();
        clientes.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(clientes)
    }

    async fn buscar_clientes(&self, ids: &[i64]) -> AppResult<Vec<Cliente>> {
        let tablas = self.tablas.read().await;
        Ok(ids.iter().filter_map(|id| tablas.clientes.get(id).cloned()).collect())
    }

    async fn listar_clientes(&self) -> AppResult<Vec<Cliente>> {
        let tablas = self.tablas.read().await;
        let mut clientes: Vec<Cliente> = tablas.clientes.values().cloned().collect();
        clientes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(clientes)
    }

    async fn repartidores_activos(&self) -> AppResult<Vec<Repartidor>> {
        let tablas = self.tablas.read().await;
        let mut repartidores: Vec<Repartidor> = tablas
            .repartidores
            .values()
            .filter(|r| r.esta_activo())
            .cloned()
            .collect();
        repartidores.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(repartidores)
    }

    async fn buscar_repartidor(&self, id: i64) -> AppResult<Option<Repartidor>> {
        Ok(self.tablas.read().await.repartidores.get(&id).cloned())
    }

    async fn repartidor_por_usuario(&self, user_auth_id: Uuid) -> AppResult<Option<Repartidor>> {
        let tablas = self.tablas.read().await;
        Ok(tablas
            .repartidores
            .values()
            .find(|r| r.user_auth_id == Some(user_auth_id))
            .cloned())
    }
}

#[async_trait]
impl RepartoRepository for MemoryStore {
    async fn repartos_de_repartidor(&self, repartidor_id: i64) -> AppResult<Vec<Reparto>> {
        let tablas = self.tablas.read().await;
        let mut repartos: Vec<Reparto> = tablas
            .repartos
            .values()
            .filter(|r| r.repartidor_id == repartidor_id)
            .cloned()
            .collect();
        repartos.sort_by(|a, b| {
            b.fecha_reparto
                .cmp(&a.fecha_reparto)
                .then(b.id.cmp(&a.id))
        });
        Ok(repartos)
    }

    async fn buscar_reparto(&self, id: i64) -> AppResult<Option<Reparto>> {
        Ok(self.tablas.read().await.repartos.get(&id).cloned())
    }

    async fn paradas_de_repartos(&self, reparto_ids: &[i64]) -> AppResult<Vec<ParadaConEnvio>> {
        let tablas = self.tablas.read().await;
        let paradas: Vec<ParadaReparto> = tablas
            .paradas
            .values()
            .filter(|p| reparto_ids.contains(&p.reparto_id))
            .cloned()
            .collect();
        let envios: Vec<Envio> = paradas
            .iter()
            .filter_map(|p| tablas.envios.get(&p.envio_id).cloned())
            .collect();
        Ok(unir_con_envios(paradas, envios))
    }

    async fn actualizar_estado_reparto(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoReparto,
    ) -> AppResult<Option<Reparto>> {
        let mut tablas = self.tablas.write().await;
        let Some(reparto) = tablas
            .repartos
            .get_mut(&id)
            .filter(|r| r.repartidor_id == repartidor_id)
        else {
            return Ok(None);
        };

        reparto.estado = cambio.estado;
        if cambio.hora_inicio.is_some() {
            reparto.hora_inicio = cambio.hora_inicio;
        }
        if cambio.hora_fin.is_some() {
            reparto.hora_fin = cambio.hora_fin;
        }
        reparto.updated_at = Utc::now();
        Ok(Some(reparto.clone()))
    }

    async fn crear_reparto_con_paradas(
        &self,
        nuevo: &NuevoReparto,
        paradas: &[NuevaParada],
    ) -> AppResult<RepartoConParadas> {
        let mut tablas = self.tablas.write().await;

        let mut ordenes: Vec<i32> = paradas.iter().map(|p| p.orden_visita).collect();
        ordenes.sort_unstable();
        ordenes.dedup();
        if ordenes.len() != paradas.len() {
            return Err(AppError::Conflict(
                "orden_visita repetido dentro del reparto".to_string(),
            ));
        }

        let ahora = Utc::now();
        let reparto = Reparto {
            id: siguiente_id(&tablas.repartos),
            fecha_reparto: nuevo.fecha_reparto,
            repartidor_id: nuevo.repartidor_id,
            empresa_asociada_id: nuevo.empresa_asociada_id,
            estado: nuevo.estado,
            notas: nuevo.notas.clone(),
            hora_inicio: None,
            hora_fin: None,
            created_at: ahora,
            updated_at: ahora,
        };
        tablas.repartos.insert(reparto.id, reparto.clone());

        let mut creadas = Vec::with_capacity(paradas.len());
        for nueva in paradas {
            let envio = envio_desde(siguiente_id(&tablas.envios), &nueva.envio);
            tablas.envios.insert(envio.id, envio.clone());

            let parada = ParadaReparto {
                id: siguiente_id(&tablas.paradas),
                reparto_id: reparto.id,
                envio_id: envio.id,
                descripcion_parada: Some(nueva.descripcion_parada.clone()),
                orden_visita: nueva.orden_visita,
                estado_parada: nueva.estado_parada,
                hora_estimada_llegada: None,
                hora_real_llegada: None,
                created_at: ahora,
                updated_at: ahora,
            };
            tablas.paradas.insert(parada.id, parada.clone());

            creadas.push(ParadaConEnvio { parada, envio });
        }

        Ok(RepartoConParadas {
            reparto,
            paradas: creadas,
        })
    }
}

#[async_trait]
impl ParadaRepository for MemoryStore {
    async fn buscar_parada(&self, id: i64) -> AppResult<Option<ParadaReparto>> {
        Ok(self.tablas.read().await.paradas.get(&id).cloned())
    }

    async fn actualizar_estado_parada(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoParada,
    ) -> AppResult<Option<ParadaReparto>> {
        let mut tablas = self.tablas.write().await;

        let reparto_id = match tablas.paradas.get(&id) {
            Some(parada) => parada.reparto_id,
            None => return Ok(None),
        };
        let es_del_repartidor = tablas
            .repartos
            .get(&reparto_id)
            .is_some_and(|r| r.repartidor_id == repartidor_id);
        if !es_del_repartidor {
            return Ok(None);
        }

        let Some(parada) = tablas.paradas.get_mut(&id) else {
            return Ok(None);
        };
        parada.estado_parada = cambio.estado;
        if cambio.hora_real_llegada.is_some() {
            parada.hora_real_llegada = cambio.hora_real_llegada;
        }
        parada.updated_at = Utc::now();
        Ok(Some(parada.clone()))
    }
}

#[async_trait]
impl EnvioRepository for MemoryStore {
    async fn envios_de_repartidor(&self, repartidor_id: i64) -> AppResult<Vec<Envio>> {
        let tablas = self.tablas.read().await;
        let mut envios: Vec<Envio> = tablas
            .envios
            .values()
            .filter(|e| e.pertenece_a(repartidor_id))
            .cloned()
            .collect();
        envios.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(envios)
    }

    async fn buscar_envio(&self, id: i64) -> AppResult<Option<Envio>> {
        Ok(self.tablas.read().await.envios.get(&id).cloned())
    }

    async fn actualizar_estado_envio(
        &self,
        id: i64,
        repartidor_id: i64,
        cambio: &CambioEstadoEnvio,
    ) -> AppResult<Option<Envio>> {
        let mut tablas = self.tablas.write().await;
        let Some(envio) = tablas.envios.get_mut(&id).filter(|e| e.pertenece_a(repartidor_id)) else {
            return Ok(None);
        };

        envio.estado = cambio.estado;
        if cambio.fecha_entrega_real.is_some() {
            envio.fecha_entrega_real = cambio.fecha_entrega_real;
        }
        if cambio.foto_comprobante.is_some() {
            envio.foto_comprobante = cambio.foto_comprobante.clone();
        }
        envio.updated_at = Utc::now();
        Ok(Some(envio.clone()))
    }
}

#[async_trait]
impl UsuarioRepository for MemoryStore {
    async fn crear_usuario(&self, nuevo: &NuevoUsuario) -> AppResult<Usuario> {
        let mut tablas = self.tablas.write().await;
        if tablas.usuarios.values().any(|u| u.email == nuevo.email) {
            return Err(email_duplicado());
        }

        let usuario = Usuario {
            id: Uuid::new_v4(),
            email: nuevo.email.clone(),
            nombre: nuevo.nombre.clone(),
            password_hash: nuevo.password_hash.clone(),
            created_at: Utc::now(),
        };
        tablas.usuarios.insert(usuario.id, usuario.clone());
        Ok(usuario)
    }

    async fn buscar_usuario_por_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        let tablas = self.tablas.read().await;
        Ok(tablas.usuarios.values().find(|u| u.email == email).cloned())
    }

    async fn buscar_usuario(&self, id: Uuid) -> AppResult<Option<Usuario>> {
        Ok(self.tablas.read().await.usuarios.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EstadoEnvio, EstadoParada, EstadoReparto};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    fn nuevo_envio(destino: &str) -> NuevoEnvio {
        NuevoEnvio {
            direccion_origen: "Depósito".to_string(),
            origen: None,
            direccion_destino: destino.to_string(),
            destino: None,
            empresa_origen_id: Some(1),
            remitente_cliente_id: None,
            nombre_destinatario: None,
            telefono_destinatario: None,
            repartidor_asignado_id: Some(7),
            precio: Decimal::ZERO,
            estado: EstadoEnvio::Asignado,
            fecha_estimada_entrega: None,
            es_parada_inicio: false,
            detalles_adicionales: None,
        }
    }

    fn nueva_parada(orden: i32) -> NuevaParada {
        NuevaParada {
            orden_visita: orden,
            descripcion_parada: format!("Parada {}", orden),
            estado_parada: EstadoParada::Asignado,
            envio: nuevo_envio(&format!("Calle {}", orden)),
        }
    }

    fn nuevo_reparto() -> NuevoReparto {
        NuevoReparto {
            fecha_reparto: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            repartidor_id: 7,
            empresa_asociada_id: Some(1),
            estado: EstadoReparto::Planificado,
            notas: None,
        }
    }

    #[tokio::test]
    async fn crea_reparto_con_paradas_y_envios() {
        let store = MemoryStore::new();
        let creado = store
            .crear_reparto_con_paradas(&nuevo_reparto(), &[nueva_parada(0), nueva_parada(1)])
            .await
            .unwrap();

        assert_eq!(creado.paradas.len(), 2);
        let leidas = store.paradas_de_reparto(creado.reparto.id).await.unwrap();
        let ordenes: Vec<i32> = leidas.iter().map(|p| p.parada.orden_visita).collect();
        assert_eq!(ordenes, vec![0, 1]);
        assert_eq!(store.envios_de_repartidor(7).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn orden_repetido_no_deja_nada_escrito() {
        let store = MemoryStore::new();
        let resultado = store
            .crear_reparto_con_paradas(&nuevo_reparto(), &[nueva_parada(0), nueva_parada(0)])
            .await;

        assert!(matches!(resultado, Err(AppError::Conflict(_))));
        assert!(store.repartos_de_repartidor(7).await.unwrap().is_empty());
        assert!(store.envios_de_repartidor(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn actualizacion_ajena_no_modifica() {
        let store = MemoryStore::new();
        let creado = store
            .crear_reparto_con_paradas(&nuevo_reparto(), &[nueva_parada(0)])
            .await
            .unwrap();
        let parada_id = creado.paradas[0].parada.id;

        let cambio = CambioEstadoParada {
            estado: EstadoParada::EnProgreso,
            hora_real_llegada: None,
        };
        assert!(store.actualizar_estado_parada(parada_id, 99, &cambio).await.unwrap().is_none());
        let intacta = store.buscar_parada(parada_id).await.unwrap().unwrap();
        assert_eq!(intacta.estado_parada, EstadoParada::Asignado);

        let hora = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        let completar = CambioEstadoParada {
            estado: EstadoParada::Completado,
            hora_real_llegada: Some(hora),
        };
        let actualizada = store
            .actualizar_estado_parada(parada_id, 7, &completar)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(actualizada.hora_real_llegada, Some(hora));
    }

    #[tokio::test]
    async fn email_duplicado_es_conflicto() {
        let store = MemoryStore::new();
        let nuevo = NuevoUsuario {
            email: "ana@rumbo.test".to_string(),
            nombre: "Ana".to_string(),
            password_hash: "hash".to_string(),
        };
        store.crear_usuario(&nuevo).await.unwrap();
        assert!(matches!(store.crear_usuario(&nuevo).await, Err(AppError::Conflict(_))));
    }
}
