pub mod core;
pub mod types;
pub mod utils;
#[cfg(windows)]
pub mod win32;

pub use self::core::*;
pub use self::types::*;
pub use self::utils::*;
#[cfg(windows)]
pub use self::win32::*;
