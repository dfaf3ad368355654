use cb_core::RegistryRoot;

/// A key opened with read access.
pub trait RegistryKey {
    /// Names of the values under the key, in enumeration order. Entries that
    /// fail to enumerate are skipped.
    fn value_names(&self) -> Box<dyn Iterator<Item = String> + '_>;
}

pub trait RegistryView {
    type Key: RegistryKey;

    /// `None` when the key cannot be opened for reading.
    fn open(&self, root: RegistryRoot, sub_key: &str) -> Option<Self::Key>;
}
