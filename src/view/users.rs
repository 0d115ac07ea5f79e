//! Per-user activity from the processlist.
//!
//! Processlist values are a point-in-time picture, so there is no baseline
//! and the view always shows absolute values.

use super::ViewKind;
use super::common::{RowFormat, display_name};
use crate::fmt::{divide, format_amount, format_pct, format_time};
use crate::model::UserRow;

pub struct UserFormat;

impl RowFormat<UserRow> for UserFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::UserLatency
    }

    fn title(&self) -> &'static str {
        "Activity by Username (processlist)"
    }

    fn headings(&self) -> String {
        format!(
            "{:>10} {:>6}|{:>10} {:>6}|{:>4} {:>4}|{:>5} {:>3}|{:>4} {:>4} {:>4} {:>4} {:>4}|{}",
            "Run Time",
            "%",
            "Sleeping",
            "%",
            "Conn",
            "Actv",
            "Hosts",
            "DBs",
            "Sel",
            "Ins",
            "Upd",
            "Del",
            "Oth",
            "User"
        )
    }

    fn content(&self, row: &UserRow, totals: &UserRow) -> String {
        format!(
            "{:>10} {:>6}|{:>10} {:>6}|{:>4} {:>4}|{:>5} {:>3}|{:>4} {:>4} {:>4} {:>4} {:>4}|{}",
            format_time(row.runtime),
            format_pct(divide(row.runtime, totals.runtime)),
            format_time(row.sleeptime),
            format_pct(divide(row.sleeptime, totals.sleeptime)),
            format_amount(row.connections),
            format_amount(row.active),
            format_amount(row.hosts),
            format_amount(row.dbs),
            format_amount(row.selects),
            format_amount(row.inserts),
            format_amount(row.updates),
            format_amount(row.deletes),
            format_amount(row.other),
            display_name(row)
        )
    }

    fn have_relative_stats(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_have_no_relative_stats() {
        assert!(!UserFormat.have_relative_stats());
    }

    #[test]
    fn sleeping_only_user_is_listed() {
        let row = UserRow {
            name: "batch".into(),
            sleeptime: 60_000_000_000_000,
            connections: 2,
            ..UserRow::default()
        };
        let line = UserFormat.content(&row, &row);
        assert!(line.contains("      1:00 100.0%"));
        assert!(line.ends_with("|batch"));
    }
}
