use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Repartidor, Usuario};
use crate::utils::validation::validate_not_blank;

// Registro de una cuenta nueva
#[derive(Debug, Deserialize, Validate)]
pub struct RegistroRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "La contraseña debe tener entre 6 y 100 caracteres"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"),
        custom = "validate_not_blank"
    )]
    pub nombre: String,
}

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El email es requerido"))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es requerida"))]
    pub password: String,
}

// Sesión emitida junto con el perfil
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub usuario: Usuario,
    pub repartidor: Option<Repartidor>,
}

// Sesión actual
#[derive(Debug, Serialize)]
pub struct SesionResponse {
    pub usuario: Usuario,
    pub repartidor: Option<Repartidor>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registro_valida_email_y_password() {
        let valido = RegistroRequest {
            email: "ana@rumbo.test".to_string(),
            password: "secreto".to_string(),
            nombre: "Ana".to_string(),
        };
        assert!(valido.validate().is_ok());

        let invalido = RegistroRequest {
            email: "no-es-email".to_string(),
            password: "123".to_string(),
            nombre: "   ".to_string(),
        };
        let errores = invalido.validate().unwrap_err();
        let campos = errores.field_errors();
        assert!(campos.contains_key("email"));
        assert!(campos.contains_key("password"));
        assert!(campos.contains_key("nombre"));
    }
}
