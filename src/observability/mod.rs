//! Observabilidad: métricas Prometheus

pub mod metrics;

pub use metrics::Metrics;
