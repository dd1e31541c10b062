//! Day/thread grouping of history records for display.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::HistoryRecord;
use super::relative_day::describe_day;
use crate::session::ThreadId;

/// One thread's records within a day, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadGroup {
    pub thread_id: ThreadId,
    pub records: Vec<HistoryRecord>,
}

impl ThreadGroup {
    /// Timestamp of the earliest record; groups are never empty.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.records.first().and_then(|record| record.date)
    }
}

/// All threads touched on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub threads: Vec<ThreadGroup>,
}

impl DayGroup {
    /// Relative label ("Today", "Yesterday", "Last N days").
    pub fn label(&self, today: NaiveDate) -> String {
        describe_day(self.date, today)
    }
}

/// Builds the history view: most recent day first, and within a day threads
/// and records in ascending time order.
///
/// Days are collected in ascending order and the thread/record order inside
/// each day is ascending; only the final day sequence is reversed.
pub struct HistoryAggregator;

impl HistoryAggregator {
    /// Groups records by day in the local time zone.
    pub fn build(records: &[HistoryRecord]) -> Vec<DayGroup> {
        Self::build_in(records, &Local)
    }

    /// Groups records by day in the given time zone.
    ///
    /// Records without a timestamp are skipped.
    pub fn build_in<Tz: TimeZone>(records: &[HistoryRecord], tz: &Tz) -> Vec<DayGroup> {
        let mut days: BTreeMap<NaiveDate, Vec<&HistoryRecord>> = BTreeMap::new();
        for record in records {
            let Some(date) = record.date else {
                continue;
            };
            let day = date.with_timezone(tz).date_naive();
            days.entry(day).or_default().push(record);
        }

        let mut groups: Vec<DayGroup> = days
            .into_iter()
            .map(|(date, records)| DayGroup {
                date,
                threads: group_threads(records),
            })
            .collect();

        groups.reverse();
        groups
    }
}

fn group_threads(records: Vec<&HistoryRecord>) -> Vec<ThreadGroup> {
    // BTreeMap keeps tie-breaking between equal start times deterministic.
    let mut by_thread: BTreeMap<&ThreadId, Vec<HistoryRecord>> = BTreeMap::new();
    for record in records {
        by_thread
            .entry(&record.thread_id)
            .or_default()
            .push(record.clone());
    }

    let mut threads: Vec<ThreadGroup> = by_thread
        .into_iter()
        .map(|(thread_id, mut records)| {
            records.sort_by_key(|record| record.date);
            ThreadGroup {
                thread_id: thread_id.clone(),
                records,
            }
        })
        .collect();

    threads.sort_by_key(ThreadGroup::started_at);
    threads
}
