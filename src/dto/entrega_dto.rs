use serde::Deserialize;
use validator::Validate;

use crate::models::EstadoEnvio;
use crate::utils::validation::validate_url_foto;

#[derive(Debug, Deserialize)]
pub struct CambiarEstadoEntregaRequest {
    pub estado: EstadoEnvio,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompletarEntregaRequest {
    /// URL de la foto ya subida; el archivo no pasa por este servicio
    #[validate(custom = "validate_url_foto")]
    pub foto_comprobante: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntregasQuery {
    /// Estado concreto o `todos`
    pub estado: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foto_debe_ser_url_http() {
        let valida = CompletarEntregaRequest {
            foto_comprobante: Some("https://fotos.rumbo.test/1.jpg".to_string()),
        };
        assert!(valida.validate().is_ok());

        let invalida = CompletarEntregaRequest {
            foto_comprobante: Some("file:///tmp/1.jpg".to_string()),
        };
        assert!(invalida.validate().is_err());

        assert!(CompletarEntregaRequest::default().validate().is_ok());
    }
}
