pub mod document;
pub mod error;
pub mod generation_settings;
pub mod report;

// Tabular input and column roles
pub mod dataset;
// Placeholder value sources
pub mod mapping;
