//! Progress reporting hooks
//!
//! These traits let callers follow a synthesis run without the engine
//! depending on any terminal UI.

use registry::ResourceKind;

/// Progress callback for synthesis runs
///
/// Implement this trait to receive progress updates while resources are
/// synthesized.
pub trait ProgressCallback {
    /// Called once before the first resource, with the number of
    /// checkout files to process
    fn on_start(&mut self, total: usize);

    /// Called after a resource block and its import are appended
    fn on_resource(&mut self, kind: ResourceKind, address: &str);

    /// Called when a checkout file is not synthesized
    fn on_skip(&mut self, kind: ResourceKind, label: &str, reason: &str) {
        let _ = (kind, label, reason);
    }

    /// Called once the document is complete
    fn on_complete(&mut self, blocks: usize);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_resource(&mut self, _kind: ResourceKind, _address: &str) {}
    fn on_complete(&mut self, _blocks: usize) {}
}
