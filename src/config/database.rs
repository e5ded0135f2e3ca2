//! Configuración de base de datos
//!
//! Este módulo maneja la configuración del pool de PostgreSQL con SQLx.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::environment::EnvironmentConfig;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// Configuración a partir del entorno; `None` si no hay DATABASE_URL
    pub fn from_environment(config: &EnvironmentConfig) -> Option<Self> {
        config.database_url.as_ref().map(|url| Self {
            max_connections: config.db_max_connections,
            ..Self::new(url.clone())
        })
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin_url_no_hay_config() {
        assert!(DatabaseConfig::from_environment(&EnvironmentConfig::default()).is_none());
    }

    #[test]
    fn respeta_max_connections() {
        let env = EnvironmentConfig {
            database_url: Some("postgres://u:p@localhost/rumbo".to_string()),
            db_max_connections: 7,
            ..EnvironmentConfig::default()
        };
        let config = DatabaseConfig::from_environment(&env).unwrap();
        assert_eq!(config.max_connections, 7);
        assert_eq!(config.url, "postgres://u:p@localhost/rumbo");
    }
}
