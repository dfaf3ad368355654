use super::types::{RegistryKey, RegistryView};
use cb_core::RegistryRoot;
use winreg::{
    enums::{HKEY_CLASSES_ROOT, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS, KEY_READ},
    RegKey,
};

/// The live Windows registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

impl RegistryView for SystemRegistry {
    type Key = RegKey;

    fn open(&self, root: RegistryRoot, sub_key: &str) -> Option<RegKey> {
        let hive = RegKey::predef(match root {
            RegistryRoot::CurrentUser => HKEY_CURRENT_USER,
            RegistryRoot::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryRoot::ClassesRoot => HKEY_CLASSES_ROOT,
            RegistryRoot::Users => HKEY_USERS,
        });

        match hive.open_subkey_with_flags(sub_key, KEY_READ) {
            Ok(key) => Some(key),
            Err(e) => {
                log::debug!("cannot open {}\\{}: {}", root, sub_key, e);
                None
            }
        }
    }
}

impl RegistryKey for RegKey {
    fn value_names(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(
            self.enum_values()
                .filter_map(|entry| entry.ok())
                .map(|(name, _)| name),
        )
    }
}
