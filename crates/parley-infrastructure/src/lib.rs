//! Infrastructure layer for Parley: file locations, configuration loading and
//! durable history storage.

pub mod config_service;
pub mod jsonl_history_repository;
pub mod memory_history_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::jsonl_history_repository::JsonlHistoryRepository;
pub use crate::memory_history_repository::InMemoryHistoryRepository;
pub use crate::paths::ParleyPaths;
