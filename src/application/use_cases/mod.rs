// Heuristics over dataset rows
pub mod amount_parser;
pub mod column_classifier;
pub mod display_name;

// Template handling
pub mod substitution;
pub mod template_scanner;

// Generation runs
pub mod attestation;
pub mod document_generator;
pub mod field_resolver;
