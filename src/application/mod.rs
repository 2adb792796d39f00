pub mod use_cases;

pub use use_cases::attestation::{generate_attestations, AttestationGenerator};
pub use use_cases::document_generator::{generate_documents, generate_from_settings, generate_with};
pub use use_cases::field_resolver::{validate_mapping, FieldResolver};
pub use use_cases::substitution::{substitute_placeholders, Substitutions};
pub use use_cases::template_scanner::scan_placeholders;
