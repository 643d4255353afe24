/// Collects streamed text fragments into the raw blob a stage parses
/// once the model finishes talking.
///
/// Fragments are appended verbatim.  Parsing never happens mid-stream,
/// so the accumulator does not try to be clever about line boundaries.
#[derive(Debug, Clone, Default)]
pub struct StreamAccumulator {
    text: String,
}

impl StreamAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment exactly as it arrived.
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// The blob accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the accumulator, returning the full blob.
    pub fn into_text(self) -> String {
        self.text
    }

    /// True when nothing has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
