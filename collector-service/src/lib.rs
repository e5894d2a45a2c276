pub mod aggregator;
pub mod collector;
pub mod orchestrator;

pub use aggregator::aggregate;
pub use collector::{CollectOutcome, Collector, CollectorConfig, StopReason};
pub use orchestrator::{format_timestamp, Clock, FixedClock, Orchestrator, RunSummary, SystemClock};
