// ============================================================
// SUBSTITUTION ENGINE
// ============================================================
// Two tiers per paragraph:
// 1. run-local: placeholders wholly inside one text segment are
//    replaced in place, keeping the run's formatting
// 2. split-run: placeholders the document fragmented across
//    several runs are located as (segment, offset) spans in the
//    paragraph's joined text; the value goes into the segment the
//    placeholder starts in, the rest of the span is cut out

use std::ops::AddAssign;

use docx_rs::Docx;
use tracing::debug;

use crate::domain::document::TextSegment;
use crate::domain::error::Result;
use crate::domain::mapping::ValueMapping;
use crate::infrastructure::docx::{
    escape_text_nodes, for_each_paragraph_mut, text_segments_mut, Template,
};

/// Replacement counts, per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Substitutions {
    pub run_local: usize,
    pub split: usize,
}

impl AddAssign for Substitutions {
    fn add_assign(&mut self, other: Self) {
        self.run_local += other.run_local;
        self.split += other.split;
    }
}

struct KeyMatch<'v> {
    start: usize,
    end: usize,
    value: &'v str,
}

/// Leftmost key occurrence at or after `from`; the longest key wins a tie.
fn next_match<'v>(text: &str, from: usize, values: &'v ValueMapping) -> Option<KeyMatch<'v>> {
    let haystack = &text[from..];
    values
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .filter_map(|(key, value)| {
            haystack.find(key).map(|at| KeyMatch {
                start: from + at,
                end: from + at + key.len(),
                value,
            })
        })
        .min_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)))
}

/// Single left-to-right pass, so a value containing a key is not expanded again.
fn replace_keys(text: &str, values: &ValueMapping) -> Option<(String, usize)> {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut count = 0;

    while let Some(found) = next_match(text, cursor, values) {
        output.push_str(&text[cursor..found.start]);
        output.push_str(found.value);
        cursor = found.end;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    output.push_str(&text[cursor..]);
    Some((output, count))
}

/// Byte ranges of each segment inside the joined paragraph text.
struct SegmentIndex {
    bounds: Vec<(usize, usize)>,
}

impl SegmentIndex {
    fn new<S: TextSegment>(segments: &[S]) -> Self {
        let mut start = 0;
        let bounds = segments
            .iter()
            .map(|segment| {
                let end = start + segment.text().len();
                let range = (start, end);
                start = end;
                range
            })
            .collect();
        Self { bounds }
    }

    fn start(&self, segment: usize) -> usize {
        self.bounds[segment].0
    }

    /// Segment owning the byte at `pos`, with the offset inside it. Empty
    /// segments never own a byte.
    fn owner(&self, pos: usize) -> (usize, usize) {
        let segment = self.bounds.partition_point(|(_, end)| *end <= pos);
        (segment, pos - self.start(segment))
    }
}

/// A placeholder occurrence spanning segments `first..=last`.
struct SpanEdit<'v> {
    first: usize,
    first_offset: usize,
    last: usize,
    last_end: usize,
    value: &'v str,
}

fn substitute_split<S: TextSegment>(segments: &mut [S], values: &ValueMapping) -> usize {
    let joined: String = segments.iter().map(|segment| segment.text()).collect();
    let index = SegmentIndex::new(segments);

    let mut edits = Vec::new();
    let mut cursor = 0;
    while let Some(found) = next_match(&joined, cursor, values) {
        cursor = found.end;
        let (first, first_offset) = index.owner(found.start);
        let (last, _) = index.owner(found.end - 1);
        // left over by tier 1, so it came from a replacement value
        if first == last {
            continue;
        }
        edits.push(SpanEdit {
            first,
            first_offset,
            last,
            last_end: found.end - index.start(last),
            value: found.value,
        });
    }

    // back to front: an edit never shifts offsets of the edits before it
    for edit in edits.iter().rev() {
        let head = segments[edit.first].text()[..edit.first_offset].to_string();
        segments[edit.first].set_text(head + edit.value);

        for segment in segments[edit.first + 1..edit.last].iter_mut() {
            segment.set_text(String::new());
        }

        let tail = segments[edit.last].text()[edit.last_end..].to_string();
        segments[edit.last].set_text(tail);
    }

    edits.len()
}

/// Replace every mapped placeholder in one paragraph's ordered segments.
pub fn substitute_segments<S: TextSegment>(
    segments: &mut [S],
    values: &ValueMapping,
) -> Substitutions {
    let mut counts = Substitutions::default();
    if values.is_empty() || segments.is_empty() {
        return counts;
    }

    for segment in segments.iter_mut() {
        if let Some((text, count)) = replace_keys(segment.text(), values) {
            segment.set_text(text);
            counts.run_local += count;
        }
    }

    counts.split = substitute_split(segments, values);
    counts
}

/// Substitute across the body and every (nested) table cell.
pub fn substitute_placeholders(docx: &mut Docx, values: &ValueMapping) -> Substitutions {
    let mut counts = Substitutions::default();
    for_each_paragraph_mut(docx, &mut |paragraph| {
        let mut segments = text_segments_mut(paragraph);
        counts += substitute_segments(&mut segments, values);
    });

    debug!(
        run_local = counts.run_local,
        split = counts.split,
        "Substituted placeholders"
    );
    counts
}

/// Fresh copy of the template with `values` substituted, text nodes
/// escaped and ready to pack.
pub fn render(template: &Template, values: &ValueMapping) -> Result<Docx> {
    let mut docx = template.instantiate()?;
    substitute_placeholders(&mut docx, values);
    escape_text_nodes(&mut docx);
    Ok(docx)
}
