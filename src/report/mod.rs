pub mod generator;
pub mod stats;

pub use generator::{render_report, write_report};
pub use stats::{calculate_stats, TaskStats};
