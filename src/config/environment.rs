//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use crate::utils::errors::AppError;

const JWT_SECRET_DESARROLLO: &str = "rumbo-envios-secreto-de-desarrollo";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub jwt_secret: String,
    /// Duración de la sesión en segundos
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Semilla JSON para el almacenamiento en memoria
    pub seed_file: Option<String>,
    /// Costo de bcrypt para contraseñas nuevas
    pub bcrypt_cost: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            jwt_secret: JWT_SECRET_DESARROLLO.to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            database_url: None,
            db_max_connections: 20,
            seed_file: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno; los valores ausentes toman el default
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "development" => defaults.jwt_secret,
            _ => {
                return Err(AppError::Internal(
                    "JWT_SECRET must be set outside development".to_string(),
                ))
            }
        };

        Ok(Self {
            port: parse_or_default("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            jwt_secret,
            jwt_expiration: parse_or_default("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_lista(&raw))
                .unwrap_or_default(),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            db_max_connections: parse_or_default("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            seed_file: env::var("SEED_FILE").ok().filter(|f| !f.trim().is_empty()),
            bcrypt_cost: parse_or_default("BCRYPT_COST", defaults.bcrypt_cost)?,
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

fn parse_lista(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
