pub mod effort_table;
pub mod maintenance_signals;

pub use effort_table::{EffortPolicy, DEFAULT_DOCUMENTED_EFFORT};
pub use maintenance_signals::{recency_sigmoid, MaintenanceSignals};
