use super::types::{ResourceSink, ResourceSource};
use cb_core::{ChainError, ResourceSlot, RESOURCE_LANGUAGE, RESOURCE_TYPE};
use std::{ffi::c_void, io, path::Path, slice};
use windows::{
    core::{HSTRING, PCWSTR},
    Win32::{
        Foundation::{FreeLibrary, HANDLE, HMODULE},
        System::LibraryLoader::{
            BeginUpdateResourceW, EndUpdateResourceW, FindResourceW, LoadLibraryExW, LoadResource,
            LockResource, SizeofResource, UpdateResourceW, LOAD_LIBRARY_AS_DATAFILE,
            LOAD_LIBRARY_AS_IMAGE_RESOURCE,
        },
    },
};

/// MAKEINTRESOURCE
#[inline]
fn int_resource(id: u16) -> PCWSTR {
    PCWSTR(id as usize as *const u16)
}

/// Resource table of a loaded module: the running executable by default, or an
/// image on disk mapped as a data file.
#[derive(Debug)]
pub struct ModuleResources {
    module: HMODULE,
    owned: bool,
}

impl Default for ModuleResources {
    fn default() -> Self {
        Self {
            module: HMODULE::default(),
            owned: false,
        }
    }
}

impl ModuleResources {
    /// Maps `image` for resource access only; nothing in it is executed.
    pub fn open(image: &Path) -> Result<Self, ChainError> {
        if !image.is_file() {
            return Err(ChainError::MissingInputFile(image.to_path_buf()));
        }

        let file = HSTRING::from(image.as_os_str());
        let module = unsafe {
            LoadLibraryExW(
                &file,
                HANDLE::default(),
                LOAD_LIBRARY_AS_DATAFILE | LOAD_LIBRARY_AS_IMAGE_RESOURCE,
            )
        }
        .map_err(|e| ChainError::Io(io::Error::other(format!("{:?}: {}", image, e))))?;

        Ok(Self {
            module,
            owned: true,
        })
    }

    /// Raw CUSTOM resource by numeric id, `None` when the module has no such entry.
    pub fn read_id(&self, id: u16) -> Option<Vec<u8>> {
        let kind = HSTRING::from(RESOURCE_TYPE);

        unsafe {
            let info = FindResourceW(self.module, int_resource(id), &kind);
            if info.0 == 0 {
                return None;
            }

            let handle = LoadResource(self.module, info).ok()?;
            let size = SizeofResource(self.module, info) as usize;
            if size == 0 {
                return Some(Vec::new());
            }

            let data = LockResource(handle) as *const u8;
            if data.is_null() {
                return None;
            }

            // Resource memory stays mapped while the module is loaded; copy it out.
            Some(slice::from_raw_parts(data, size).to_vec())
        }
    }
}

impl ResourceSource for ModuleResources {
    fn read(&self, slot: ResourceSlot) -> Result<Vec<u8>, ChainError> {
        self.read_id(slot.id())
            .ok_or(ChainError::ResourceNotFound(slot))
    }
}

impl Drop for ModuleResources {
    fn drop(&mut self) {
        if self.owned {
            unsafe {
                let _ = FreeLibrary(self.module);
            }
        }
    }
}

/// Writes slots into an executable on disk through BeginUpdateResource /
/// UpdateResource / EndUpdateResource, one transaction per call.
#[derive(Debug, Clone, Copy)]
pub struct ImageResourceWriter {
    language: u16,
}

impl ImageResourceWriter {
    pub fn new(language: u16) -> Self {
        Self { language }
    }
}

impl Default for ImageResourceWriter {
    fn default() -> Self {
        Self::new(RESOURCE_LANGUAGE)
    }
}

impl ResourceSink for ImageResourceWriter {
    fn write(&mut self, image: &Path, slot: ResourceSlot, data: &[u8]) -> Result<(), ChainError> {
        let failure = |reason: String| ChainError::ResourceWriteFailure {
            slot,
            image: image.to_path_buf(),
            reason,
        };

        let size = u32::try_from(data.len())
            .map_err(|_| failure(format!("{} bytes exceed the resource size limit", data.len())))?;
        let file = HSTRING::from(image.as_os_str());
        let kind = HSTRING::from(slot.resource_type());

        unsafe {
            let update = BeginUpdateResourceW(&file, false).map_err(|e| failure(e.to_string()))?;

            let staged = UpdateResourceW(
                update,
                &kind,
                int_resource(slot.id()),
                self.language,
                Some(data.as_ptr() as *const c_void),
                size,
            );
            if let Err(e) = staged {
                let _ = EndUpdateResourceW(update, true);
                return Err(failure(e.to_string()));
            }

            EndUpdateResourceW(update, false).map_err(|e| failure(e.to_string()))?;
        }

        log::debug!("committed {} ({} bytes) into {:?}", slot, data.len(), image);
        Ok(())
    }
}
