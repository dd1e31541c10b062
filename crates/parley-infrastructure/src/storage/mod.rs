//! Storage layer for atomic file operations.

mod atomic_toml;
mod file_lock;

pub use atomic_toml::AtomicTomlFile;
pub(crate) use file_lock::LockedFile;
