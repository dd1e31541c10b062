//! History domain module.
//!
//! - `model`: Persisted exchange records (`HistoryRecord`, `HistoryKind`)
//! - `repository`: Storage trait (`HistoryRepository`)
//! - `aggregator`: Day/thread grouping for display (`HistoryAggregator`)
//! - `relative_day`: "Today"/"Yesterday" style day labels

mod aggregator;
mod model;
mod relative_day;
mod repository;

pub use aggregator::{DayGroup, HistoryAggregator, ThreadGroup};
pub use model::{HistoryKind, HistoryRecord};
pub use relative_day::describe_day;
pub use repository::HistoryRepository;
