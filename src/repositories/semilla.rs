//! Datos semilla para el almacenamiento en memoria
//!
//! Formato JSON:
//!
//! ```json
//! {
//!   "empresas": [{ "id": 5, "nombre": "Rumbo Central", "direccion": "Av. Siempre Viva 742" }],
//!   "clientes": [{ "id": 11, "nombre": "Ana", "apellido": "Gómez", "direccion": "Calle 1", "empresa_id": 5 }],
//!   "usuarios": [{ "email": "ana@rumbo.test", "nombre": "Ana", "password": "secreto" }],
//!   "repartidores": [{ "id": 2, "nombre": "Luis", "usuario_email": "ana@rumbo.test" }]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::{MemoryStore, UsuarioRepository};
use crate::models::{Cliente, Empresa, EstadoGeneral, NuevoUsuario, Repartidor};
use crate::services::sesion_service::hashear_password;
use crate::utils::errors::{AppError, AppResult};

fn activo() -> EstadoGeneral {
    EstadoGeneral::Activo
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Semilla {
    #[serde(default)]
    pub empresas: Vec<EmpresaSemilla>,
    #[serde(default)]
    pub clientes: Vec<ClienteSemilla>,
    #[serde(default)]
    pub usuarios: Vec<UsuarioSemilla>,
    #[serde(default)]
    pub repartidores: Vec<RepartidorSemilla>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmpresaSemilla {
    #[serde(default)]
    pub id: i64,
    pub nombre: String,
    pub direccion: String,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    #[serde(default = "activo")]
    pub estado: EstadoGeneral,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClienteSemilla {
    #[serde(default)]
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    pub direccion: String,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub empresa_id: Option<i64>,
    #[serde(default = "activo")]
    pub estado: EstadoGeneral,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsuarioSemilla {
    pub email: String,
    pub nombre: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepartidorSemilla {
    #[serde(default)]
    pub id: i64,
    pub nombre: String,
    pub apellido: Option<String>,
    /// Cuenta de identidad a enlazar (debe figurar en `usuarios`)
    pub usuario_email: Option<String>,
    #[serde(default = "activo")]
    pub estado: EstadoGeneral,
}

impl Semilla {
    pub fn desde_archivo(ruta: impl AsRef<Path>) -> anyhow::Result<Self> {
        let ruta = ruta.as_ref();
        let contenido = std::fs::read_to_string(ruta)
            .with_context(|| format!("No se pudo leer la semilla {}", ruta.display()))?;
        let semilla = serde_json::from_str(&contenido)
            .with_context(|| format!("Semilla inválida en {}", ruta.display()))?;
        Ok(semilla)
    }

    /// Carga catálogos y cuentas en el almacenamiento
    pub async fn aplicar(&self, store: &MemoryStore, bcrypt_cost: u32) -> AppResult<()> {
        let ahora = Utc::now();

        for e in &self.empresas {
            store
                .agregar_empresa(Empresa {
                    id: e.id,
                    nombre: e.nombre.clone(),
                    direccion: e.direccion.clone(),
                    latitud: e.latitud,
                    longitud: e.longitud,
                    telefono: e.telefono.clone(),
                    email: e.email.clone(),
                    estado: e.estado,
                    created_at: ahora,
                })
                .await;
        }

        for c in &self.clientes {
            store
                .agregar_cliente(Cliente {
                    id: c.id,
                    nombre: c.nombre.clone(),
                    apellido: c.apellido.clone(),
                    direccion: c.direccion.clone(),
                    latitud: c.latitud,
                    longitud: c.longitud,
                    telefono: c.telefono.clone(),
                    email: c.email.clone(),
                    empresa_id: c.empresa_id,
                    estado: c.estado,
                    created_at: ahora,
                })
                .await;
        }

        for u in &self.usuarios {
            store
                .crear_usuario(&NuevoUsuario {
                    email: u.email.trim().to_lowercase(),
                    nombre: u.nombre.clone(),
                    password_hash: hashear_password(&u.password, bcrypt_cost)?,
                })
                .await?;
        }

        for r in &self.repartidores {
            let user_auth_id = match &r.usuario_email {
                Some(email) => {
                    let usuario = store
                        .buscar_usuario_por_email(&email.trim().to_lowercase())
                        .await?
                        .ok_or_else(|| {
                            AppError::BadRequest(format!(
                                "Repartidor {} enlaza un usuario inexistente: {}",
                                r.nombre, email
                            ))
                        })?;
                    Some(usuario.id)
                }
                None => None,
            };

            store
                .agregar_repartidor(Repartidor {
                    id: r.id,
                    nombre: r.nombre.clone(),
                    apellido: r.apellido.clone(),
                    user_auth_id,
                    estado: r.estado,
                    created_at: ahora,
                })
                .await;
        }

        info!(
            empresas = self.empresas.len(),
            clientes = self.clientes.len(),
            usuarios = self.usuarios.len(),
            repartidores = self.repartidores.len(),
            "🌱 Semilla cargada"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::CatalogoRepository;
    use serde_json::json;

    #[tokio::test]
    async fn carga_y_enlaza_repartidor() {
        let semilla: Semilla = serde_json::from_value(json!({
            "empresas": [{ "id": 5, "nombre": "Rumbo Central", "direccion": "Av. 1" }],
            "clientes": [
                { "id": 11, "nombre": "Ana", "apellido": "Gómez", "direccion": "Calle 1", "empresa_id": 5 },
                { "id": 12, "nombre": "Beto", "direccion": "Calle 2", "empresa_id": 5, "estado": "inactivo" }
            ],
            "usuarios": [{ "email": "Luis@Rumbo.test", "nombre": "Luis", "password": "secreto" }],
            "repartidores": [{ "id": 2, "nombre": "Luis", "usuario_email": "luis@rumbo.test" }]
        }))
        .unwrap();

        let store = MemoryStore::new();
        semilla.aplicar(&store, 4).await.unwrap();

        assert_eq!(store.empresas_activas().await.unwrap().len(), 1);
        let activos = store.clientes_activos_de_empresa(5).await.unwrap();
        assert_eq!(activos.iter().map(|c| c.id).collect::<Vec<_>>(), vec![11]);

        let usuario = store.buscar_usuario_por_email("luis@rumbo.test").await.unwrap().unwrap();
        let repartidor = store.repartidor_por_usuario(usuario.id).await.unwrap().unwrap();
        assert_eq!(repartidor.id, 2);
    }

    #[tokio::test]
    async fn usuario_inexistente_es_error() {
        let semilla: Semilla = serde_json::from_value(json!({
            "repartidores": [{ "nombre": "Luis", "usuario_email": "nadie@rumbo.test" }]
        }))
        .unwrap();

        assert!(semilla.aplicar(&MemoryStore::new(), 4).await.is_err());
    }
}
