// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// Tabular input rows and the column-role keyword tables
// No I/O, no external dependencies beyond serde

mod column_roles;
mod dataset;

pub use column_roles::{ColumnRole, ColumnRoles, RoleRule, FULL_NAME_HINTS};
pub use dataset::{Dataset, DatasetRow, Record};
