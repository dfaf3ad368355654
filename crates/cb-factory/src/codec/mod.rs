pub mod core;
pub mod types;
#[cfg(windows)]
pub mod win32;

pub use self::core::*;
pub use self::types::*;
#[cfg(windows)]
pub use self::win32::*;
