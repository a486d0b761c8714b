//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed decorators over domain ports. Everything here is
//! feature-gated behind the `metrics` feature.

mod prometheus_domain_events;

pub use prometheus_domain_events::PrometheusEventPublisher;
