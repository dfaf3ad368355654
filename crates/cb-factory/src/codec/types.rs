use cb_core::{ChainError, ResourceSlot};
use std::path::Path;

/// Read side of the codec: a loaded image whose resource table can be queried.
pub trait ResourceSource {
    /// Raw bytes of `slot`, or `ChainError::ResourceNotFound` when the image lacks it.
    fn read(&self, slot: ResourceSlot) -> Result<Vec<u8>, ChainError>;
}

/// Write side of the codec: stages and commits one slot against an on-disk image.
///
/// Every call is its own transaction. Several calls against the same image are
/// not atomic as a group; a failure part way through leaves the earlier slots written.
pub trait ResourceSink {
    fn write(&mut self, image: &Path, slot: ResourceSlot, data: &[u8]) -> Result<(), ChainError>;
}
