pub mod aggregator;
pub mod api;
pub mod config;
pub mod display;
pub mod store;

pub use aggregator::Aggregator;
pub use config::{Config, DisplayConfig, SensorsConfig, ServerConfig};
pub use display::{DisplayError, DisplaySink, LogDisplay};
pub use store::AggregateStore;

/// State shared with every HTTP handler.
#[derive(Clone, Default)]
pub struct AppState {
    pub store: AggregateStore,
}
