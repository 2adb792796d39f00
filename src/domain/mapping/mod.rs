// ============================================================
// FIELD MAPPING DOMAIN LAYER
// ============================================================
// Placeholder → column spec tables, resolved per-row values,
// and output filename sources

mod column_spec;
mod filename;
mod values;

pub use column_spec::{
    placeholder_token, ColumnSpec, FieldMapping, PlaceholderMapping, MAX_COLUMN_SPECS,
};
pub use filename::{FilenamePart, FilenameSource, TEMPLATE_MARKER};
pub use values::ValueMapping;
