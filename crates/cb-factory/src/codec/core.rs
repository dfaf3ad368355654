use super::types::{ResourceSink, ResourceSource};
use cb_core::{text, ChainError, ResourceSlot};
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

/// Reads a string slot. Length is `byte_len / 2`; no terminator is searched for.
pub fn read_text<S: ResourceSource + ?Sized>(
    source: &S,
    slot: ResourceSlot,
) -> Result<String, ChainError> {
    source.read(slot).map(|data| text::decode_utf16le(&data))
}

pub fn write_text<W: ResourceSink + ?Sized>(
    sink: &mut W,
    image: &Path,
    slot: ResourceSlot,
    value: &str,
) -> Result<(), ChainError> {
    sink.write(image, slot, &text::encode_utf16le(value))
}

/// In-memory resource table of one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    slots: BTreeMap<u16, Vec<u8>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: ResourceSlot, data: impl Into<Vec<u8>>) {
        self.slots.insert(slot.id(), data.into());
    }

    pub fn insert_text(&mut self, slot: ResourceSlot, value: &str) {
        self.insert(slot, text::encode_utf16le(value));
    }

    pub fn remove(&mut self, slot: ResourceSlot) -> Option<Vec<u8>> {
        self.slots.remove(&slot.id())
    }

    pub fn contains(&self, slot: ResourceSlot) -> bool {
        self.slots.contains_key(&slot.id())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl ResourceSource for ResourceTable {
    fn read(&self, slot: ResourceSlot) -> Result<Vec<u8>, ChainError> {
        self.slots
            .get(&slot.id())
            .cloned()
            .ok_or(ChainError::ResourceNotFound(slot))
    }
}

/// Resource tables keyed by image path. Stands in for the OS update-resource
/// API wherever the real PE files are not needed.
#[derive(Debug, Default)]
pub struct MemoryImages {
    images: HashMap<PathBuf, ResourceTable>,
}

impl MemoryImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self, path: &Path) -> Option<&ResourceTable> {
        self.images.get(path)
    }

    pub fn take_image(&mut self, path: &Path) -> Option<ResourceTable> {
        self.images.remove(path)
    }
}

impl ResourceSink for MemoryImages {
    fn write(&mut self, image: &Path, slot: ResourceSlot, data: &[u8]) -> Result<(), ChainError> {
        if !image.is_file() {
            return Err(ChainError::ResourceWriteFailure {
                slot,
                image: image.to_path_buf(),
                reason: "image file does not exist".into(),
            });
        }
        self.images
            .entry(image.to_path_buf())
            .or_default()
            .insert(slot, data.to_vec());
        Ok(())
    }
}
