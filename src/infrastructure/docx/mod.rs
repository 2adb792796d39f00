// ============================================================
// DOCX INFRASTRUCTURE LAYER
// ============================================================
// Template loading, document saving, and paragraph traversal
// over the docx-rs object model

mod paragraphs;
mod template;

pub use paragraphs::{
    escape_text_nodes, escape_xml_text, for_each_paragraph, for_each_paragraph_mut,
    paragraph_text, text_segments_mut,
};
pub use template::{pack_docx, save_docx, Template};
