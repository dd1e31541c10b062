use chrono::NaiveDate;

/// Describes how long ago `date` was, relative to `today`.
pub fn describe_day(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days if days > 1 => format!("Last {} days", days),
        _ => "Upcoming".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(describe_day(day(20), day(20)), "Today");
        assert_eq!(describe_day(day(19), day(20)), "Yesterday");
        assert_eq!(describe_day(day(13), day(20)), "Last 7 days");
        assert_eq!(describe_day(day(21), day(20)), "Upcoming");
    }

    #[test]
    fn test_label_across_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(describe_day(day(31), today), "Last 2 days");
    }
}
