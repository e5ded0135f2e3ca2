use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub repartos_generados_total: IntCounter,
    pub paradas_generadas_total: IntCounter,
    pub transiciones_estado_total: IntCounterVec,
    pub errores_autorizacion_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let repartos_generados_total = IntCounter::new(
            "repartos_generados_total",
            "Repartos creados por generación en lote",
        )?;

        let paradas_generadas_total = IntCounter::new(
            "paradas_generadas_total",
            "Paradas creadas por generación en lote, incluida la de inicio",
        )?;

        let transiciones_estado_total = IntCounterVec::new(
            Opts::new("transiciones_estado_total", "Cambios de estado por dominio y resultado"),
            &["dominio", "resultado"],
        )?;

        let errores_autorizacion_total = IntCounterVec::new(
            Opts::new(
                "errores_autorizacion_total",
                "Accesos rechazados a recursos de otro repartidor",
            ),
            &["recurso"],
        )?;

        registry.register(Box::new(repartos_generados_total.clone()))?;
        registry.register(Box::new(paradas_generadas_total.clone()))?;
        registry.register(Box::new(transiciones_estado_total.clone()))?;
        registry.register(Box::new(errores_autorizacion_total.clone()))?;

        Ok(Self {
            registry,
            repartos_generados_total,
            paradas_generadas_total,
            transiciones_estado_total,
            errores_autorizacion_total,
        })
    }

    pub fn transicion(&self, dominio: &str, aceptada: bool) {
        let resultado = if aceptada { "aceptada" } else { "rechazada" };
        self.transiciones_estado_total
            .with_label_values(&[dominio, resultado])
            .inc();
    }

    pub fn acceso_denegado(&self, recurso: &str) {
        self.errores_autorizacion_total
            .with_label_values(&[recurso])
            .inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expone_contadores_en_texto() {
        let metrics = Metrics::new().unwrap();
        metrics.repartos_generados_total.inc();
        metrics.transicion("parada", false);
        metrics.acceso_denegado("reparto");

        let texto = metrics.encode().unwrap();
        assert!(texto.contains("repartos_generados_total 1"));
        assert!(texto.contains(r#"transiciones_estado_total{dominio="parada",resultado="rechazada"} 1"#));
        assert!(texto.contains(r#"errores_autorizacion_total{recurso="reparto"} 1"#));
    }
}
