/// A piece of paragraph text owned by a single formatting run.
///
/// A paragraph's visible text is the concatenation of its segments, in
/// order. Replacing a segment's text never touches its formatting.
pub trait TextSegment {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: String);
}

impl TextSegment for String {
    fn text(&self) -> &str {
        self
    }

    fn set_text(&mut self, text: String) {
        *self = text;
    }
}

impl<T: TextSegment + ?Sized> TextSegment for &mut T {
    fn text(&self) -> &str {
        (**self).text()
    }

    fn set_text(&mut self, text: String) {
        (**self).set_text(text)
    }
}
