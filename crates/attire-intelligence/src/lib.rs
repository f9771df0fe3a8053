// attire-intelligence/src/lib.rs

pub mod cache_management;
pub mod config;
pub mod context_engine;
pub mod shared_state;
pub mod signals;
pub mod telemetry;
pub mod utils;

// Public API exports
pub use config::Config;
pub use context_engine::{
    create_default_orchestrator, ContextOrchestrator, OrchestratorConfig, RecommendationContext,
    RecommendationRequest,
};
pub use shared_state::{AtomicCounters, CounterSnapshot, SharedSignalState, SignalProviders};
pub use signals::{SignalError, SignalResult};
