//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada y saneamiento de texto libre.

use chrono::NaiveDate;
use validator::ValidationError;

use super::errors::{AppError, AppResult};

/// Longitud máxima de cualquier texto libre tras sanear
pub const LONGITUD_MAXIMA_TEXTO: usize = 1000;

/// Validar y convertir string a fecha `YYYY-MM-DD`
pub fn parse_fecha(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Fecha inválida '{}', formato esperado YYYY-MM-DD", value)))
}

/// Quita espacios extremos y los caracteres `<` `>`, y recorta la longitud
pub fn sanitizar_texto(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(LONGITUD_MAXIMA_TEXTO)
        .collect()
}

/// Sanea un texto opcional; vacío equivale a ausente
pub fn sanitizar_opcional(input: Option<&str>) -> Option<String> {
    input.map(sanitizar_texto).filter(|s| !s.is_empty())
}

/// Validar que un string no esté vacío tras recortar espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Validar URL de foto de comprobante (sólo http/https)
pub fn validate_url_foto(value: &str) -> Result<(), ValidationError> {
    let valor = value.trim();
    let esquema_valido = valor.starts_with("https://") || valor.starts_with("http://");
    if !esquema_valido || !validator::validate_url(valor) {
        let mut error = ValidationError::new("url");
        error.message = Some("La foto de comprobante debe ser una URL http(s)".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fecha() {
        assert_eq!(
            parse_fecha("2025-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
        );
        assert!(parse_fecha("10/01/2025").is_err());
        assert!(parse_fecha("").is_err());
    }

    #[test]
    fn test_sanitizar_texto() {
        assert_eq!(sanitizar_texto("  <b>hola</b>  "), "bhola/b");
        let largo = "x".repeat(LONGITUD_MAXIMA_TEXTO + 50);
        assert_eq!(sanitizar_texto(&largo).chars().count(), LONGITUD_MAXIMA_TEXTO);
    }

    #[test]
    fn test_sanitizar_opcional() {
        assert_eq!(sanitizar_opcional(Some("   ")), None);
        assert_eq!(sanitizar_opcional(None), None);
        assert_eq!(sanitizar_opcional(Some(" nota ")), Some("nota".to_string()));
    }

    #[test]
    fn test_validate_url_foto() {
        assert!(validate_url_foto("https://cdn.example.com/comprobantes/1.jpg").is_ok());
        assert!(validate_url_foto("ftp://example.com/a.jpg").is_err());
        assert!(validate_url_foto("https://").is_err());
        assert!(validate_url_foto("https://a b.com/x.jpg").is_err());
        assert!(validate_url_foto("http://exa mple").is_err());
        assert!(validate_url_foto("https://[").is_err());
        assert!(validate_url_foto("http://a:b:c").is_err());
        assert!(validate_url_foto("http://fotos.rumbo.test:8080/entrega?id=7").is_ok());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("Ana").is_ok());
    }
}
