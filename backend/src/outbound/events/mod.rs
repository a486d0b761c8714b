//! Domain event publishers.

mod tracing_publisher;

pub use tracing_publisher::TracingEventPublisher;
