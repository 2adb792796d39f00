use docx_rs::{
    DocumentChild, Docx, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table,
    TableCellContent, TableChild, TableRowChild, Text,
};

use crate::domain::document::TextSegment;

impl TextSegment for Text {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

/// Visit every body paragraph, including those inside (nested) table cells,
/// in document order.
pub fn for_each_paragraph(docx: &Docx, f: &mut dyn FnMut(&Paragraph)) {
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => f(paragraph),
            DocumentChild::Table(table) => visit_table(table, f),
            _ => {}
        }
    }
}

fn visit_table(table: &Table, f: &mut dyn FnMut(&Paragraph)) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => f(paragraph),
                    TableCellContent::Table(nested) => visit_table(nested, f),
                    _ => {}
                }
            }
        }
    }
}

/// Mutable counterpart of [`for_each_paragraph`].
pub fn for_each_paragraph_mut(docx: &mut Docx, f: &mut dyn FnMut(&mut Paragraph)) {
    for child in docx.document.children.iter_mut() {
        match child {
            DocumentChild::Paragraph(paragraph) => f(paragraph),
            DocumentChild::Table(table) => visit_table_mut(table, f),
            _ => {}
        }
    }
}

fn visit_table_mut(table: &mut Table, f: &mut dyn FnMut(&mut Paragraph)) {
    for row in table.rows.iter_mut() {
        let TableChild::TableRow(row) = row;
        for cell in row.cells.iter_mut() {
            let TableRowChild::TableCell(cell) = cell;
            for content in cell.children.iter_mut() {
                match content {
                    TableCellContent::Paragraph(paragraph) => f(paragraph),
                    TableCellContent::Table(nested) => visit_table_mut(nested, f),
                    _ => {}
                }
            }
        }
    }
}

/// Visible text of a paragraph: its text nodes concatenated in order.
pub fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        push_child_text(child, &mut buffer);
    }
    buffer
}

fn push_child_text(child: &ParagraphChild, buffer: &mut String) {
    match child {
        ParagraphChild::Run(run) => push_run_text(run, buffer),
        ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                push_child_text(link_child, buffer);
            }
        }
        ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let InsertChild::Run(run) = insert_child {
                    push_run_text(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn push_run_text(run: &Run, buffer: &mut String) {
    for child in &run.children {
        if let RunChild::Text(text) = child {
            buffer.push_str(&text.text);
        }
    }
}

/// The paragraph's text nodes, in order, each still owned by its run.
pub fn text_segments_mut(paragraph: &mut Paragraph) -> Vec<&mut Text> {
    let mut segments = Vec::new();
    for child in paragraph.children.iter_mut() {
        collect_child_segments(child, &mut segments);
    }
    segments
}

fn collect_child_segments<'a>(child: &'a mut ParagraphChild, out: &mut Vec<&'a mut Text>) {
    match child {
        ParagraphChild::Run(run) => collect_run_segments(run, out),
        ParagraphChild::Hyperlink(link) => {
            for link_child in link.children.iter_mut() {
                collect_child_segments(link_child, out);
            }
        }
        ParagraphChild::Insert(insert) => {
            for insert_child in insert.children.iter_mut() {
                if let InsertChild::Run(run) = insert_child {
                    collect_run_segments(run, out);
                }
            }
        }
        _ => {}
    }
}

fn collect_run_segments<'a>(run: &'a mut Run, out: &mut Vec<&'a mut Text>) {
    for child in run.children.iter_mut() {
        if let RunChild::Text(text) = child {
            out.push(text);
        }
    }
}

/// XML-escape `&`, `<` and `>` for a `w:t` node.
pub fn escape_xml_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape every body text node in place.
///
/// docx-rs writes `Text` nodes verbatim; `read_docx` and direct edits leave
/// them unescaped. Call exactly once on a parsed document before packing.
pub fn escape_text_nodes(docx: &mut Docx) {
    for_each_paragraph_mut(docx, &mut |paragraph| {
        for segment in text_segments_mut(paragraph) {
            segment.text = escape_xml_text(&segment.text);
        }
    });
}
