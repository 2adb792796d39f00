mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use app::{config_path, execute, run};
pub use domain::error::{AppError, Result};
pub use domain::generation_settings::{GenerationMode, GenerationSettings};
pub use domain::report::GenerationReport;
