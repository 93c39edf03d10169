//! The set of environments a run reconciles.

use crate::error::{Error, Result};

/// Ordered environment tags plus the reference environment.
///
/// The reference environment supplies canonical values (connection
/// settings, schedules) when environments disagree. It is always a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSet {
    tags: Vec<String>,
    reference: String,
}

impl EnvironmentSet {
    /// Build a set from tags, in order, and a reference tag.
    ///
    /// Duplicate tags are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEnvironment` if `reference` is not among the
    /// tags, or if no tag is given.
    pub fn new<I, S>(tags: I, reference: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !tag.is_empty() && !unique.contains(&tag) {
                unique.push(tag);
            }
        }

        let reference = reference.into();
        if !unique.contains(&reference) {
            return Err(Error::UnknownEnvironment(reference));
        }

        Ok(Self {
            tags: unique,
            reference,
        })
    }

    /// Iterate over tags, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// The reference environment.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Check if a tag is tracked.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of tracked environments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Always false: a set holds at least its reference.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
