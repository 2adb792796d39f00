pub mod text;

pub use text::{normalize_spaces, slugify};
