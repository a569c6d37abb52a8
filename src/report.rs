use crate::models::{ReportDay, TrackedTask};
use std::collections::BTreeMap;

const DONE_STATUS: &str = "DONE";

/// Groups tracked records by tracked date, newest date first.
pub fn group_by_date(records: Vec<TrackedTask>) -> Vec<ReportDay> {
    let mut days: BTreeMap<String, Vec<TrackedTask>> = BTreeMap::new();
    for record in records {
        days.entry(record.tracked_date.clone()).or_default().push(record);
    }

    days.into_iter()
        .rev()
        .map(|(date, tasks)| ReportDay {
            done: tasks
                .iter()
                .filter(|task| task.task_status.eq_ignore_ascii_case(DONE_STATUS))
                .count(),
            total: tasks.len(),
            date,
            tasks,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(task_id: u64, date: &str, status: &str) -> TrackedTask {
        TrackedTask {
            task_id,
            user_id: 1,
            title: format!("Task {task_id}"),
            description: String::new(),
            task_status: status.into(),
            tracked_date: date.into(),
        }
    }

    #[test]
    fn groups_newest_first_with_counts() {
        let report = group_by_date(vec![
            record(1, "2026-01-04", "DONE"),
            record(1, "2026-01-05", "MISSED"),
            record(2, "2026-01-04", "MISSED"),
            record(2, "2026-01-05", "DONE"),
            record(3, "2026-01-05", "DONE"),
        ]);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].date, "2026-01-05");
        assert_eq!((report[0].done, report[0].total), (2, 3));
        assert_eq!(report[1].date, "2026-01-04");
        assert_eq!((report[1].done, report[1].total), (1, 2));
    }

    #[test]
    fn records_keep_their_order_within_a_day() {
        let report = group_by_date(vec![
            record(9, "2026-01-05", "DONE"),
            record(4, "2026-01-05", "DONE"),
        ]);
        let ids: Vec<u64> = report[0].tasks.iter().map(|task| task.task_id).collect();
        assert_eq!(ids, vec![9, 4]);
    }

    #[test]
    fn empty_history_gives_empty_report() {
        assert!(group_by_date(Vec::new()).is_empty());
    }
}
