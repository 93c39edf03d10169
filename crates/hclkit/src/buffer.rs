//! Append-only output document.

use crate::block::Block;
use crate::writer;

/// Ordered fragments of the output document.
///
/// Fragments are appended in emission order and joined once by
/// [`OutputBuffer::finish`]. Whole-document rewrites run on the finished
/// text, never on individual fragments.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    fragments: Vec<String>,
}

impl OutputBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. A newline follows each fragment.
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Append a serialized block.
    pub fn push_block(&mut self, block: &Block) {
        self.push(writer::write_string(block));
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.push(String::new());
    }

    /// Number of fragments appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if nothing was appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join the fragments into the final document.
    #[must_use]
    pub fn finish(self) -> String {
        let mut output = String::with_capacity(self.fragments.iter().map(|f| f.len() + 1).sum());
        for fragment in self.fragments {
            output.push_str(&fragment);
            if !fragment.ends_with('\n') {
                output.push('\n');
            }
        }
        output
    }
}
