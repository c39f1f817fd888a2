pub mod check_handlers;
pub mod health_handlers;
pub mod report_handlers;

pub use health_handlers::{health_check, health_check_simple};
