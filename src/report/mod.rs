pub mod generator;
pub mod stats;
pub mod status;

pub use generator::generate_report;
pub use stats::{calculate_stats, task_totals, ProductivityStats};
pub use status::status_from_store;
