use super::types::{RegistryKey, RegistryView};
use cb_core::{ChainError, RegistryMarker, RegistryRoot};
use std::{cell::RefCell, collections::HashMap};

/// Whether the marker is present.
///
/// A key-only marker (empty value name) is satisfied by the key opening at all.
/// Otherwise every value under the key is enumerated and compared case-insensitively;
/// enumeration stops at the first match.
pub fn marker_exists<G: RegistryView + ?Sized>(registry: &G, marker: &RegistryMarker) -> bool {
    let Some(key) = registry.open(marker.root, &marker.sub_key) else {
        return false;
    };

    if marker.is_key_only() {
        return true;
    }

    let wanted = marker.value_name.to_lowercase();
    let found = key
        .value_names()
        .any(|name| name.to_lowercase() == wanted);

    log::debug!("marker {} present: {}", marker, found);
    found
}

/// Parses `ROOT:SubKeyPath:ValueName` and probes it.
pub fn marker_spec_exists<G: RegistryView + ?Sized>(
    registry: &G,
    spec: &str,
) -> Result<bool, ChainError> {
    let marker: RegistryMarker = spec.parse()?;
    Ok(marker_exists(registry, &marker))
}

/// Registry held in memory. Key paths compare case-insensitively like the
/// real registry; value names keep their stored case.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RefCell<HashMap<(RegistryRoot, String), Vec<String>>>,
}

#[derive(Debug, Clone)]
pub struct MemoryKey {
    names: Vec<String>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(sub_key: &str) -> String {
        sub_key.trim_matches('\\').to_lowercase()
    }

    pub fn create_key(&self, root: RegistryRoot, sub_key: &str) {
        self.keys
            .borrow_mut()
            .entry((root, Self::normalize(sub_key)))
            .or_default();
    }

    pub fn set_value(&self, root: RegistryRoot, sub_key: &str, name: &str) {
        let mut keys = self.keys.borrow_mut();
        let names = keys.entry((root, Self::normalize(sub_key))).or_default();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }

    /// Shorthand for the value a marker names (or just its key).
    pub fn set_marker(&self, marker: &RegistryMarker) {
        if marker.is_key_only() {
            self.create_key(marker.root, &marker.sub_key);
        } else {
            self.set_value(marker.root, &marker.sub_key, &marker.value_name);
        }
    }

    pub fn delete_key(&self, root: RegistryRoot, sub_key: &str) {
        self.keys
            .borrow_mut()
            .remove(&(root, Self::normalize(sub_key)));
    }
}

impl RegistryView for MemoryRegistry {
    type Key = MemoryKey;

    fn open(&self, root: RegistryRoot, sub_key: &str) -> Option<MemoryKey> {
        self.keys
            .borrow()
            .get(&(root, Self::normalize(sub_key)))
            .map(|names| MemoryKey {
                names: names.clone(),
            })
    }
}

impl RegistryKey for MemoryKey {
    fn value_names(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(self.names.iter().cloned())
    }
}
