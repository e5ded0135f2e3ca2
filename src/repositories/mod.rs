//! Repositorios de datos
//!
//! Cada tabla se accede a través de un trait asíncrono. `PgStore` los
//! implementa sobre PostgreSQL y `MemoryStore` en memoria del proceso.
//! `Store` agrupa todos los traits para guardarlos en `AppState`.

pub mod catalogo_repository;
pub mod envio_repository;
pub mod memory_store;
pub mod parada_repository;
pub mod pg_store;
pub mod reparto_repository;
pub mod semilla;
pub mod usuario_repository;

pub use catalogo_repository::CatalogoRepository;
pub use envio_repository::EnvioRepository;
pub use memory_store::MemoryStore;
pub use parada_repository::ParadaRepository;
pub use pg_store::PgStore;
pub use reparto_repository::RepartoRepository;
pub use usuario_repository::UsuarioRepository;

/// Acceso completo al almacenamiento
pub trait Store:
    CatalogoRepository + RepartoRepository + ParadaRepository + EnvioRepository + UsuarioRepository
{
}

impl<T> Store for T where
    T: CatalogoRepository + RepartoRepository + ParadaRepository + EnvioRepository + UsuarioRepository
{
}
