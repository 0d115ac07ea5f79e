//! File I/O latency.

use super::ViewKind;
use super::common::{RowFormat, display_name};
use crate::fmt::{divide, format_amount, format_pct, format_time};
use crate::model::FileIoRow;

pub struct FileIoFormat;

impl RowFormat<FileIoRow> for FileIoFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::FileIoLatency
    }

    fn title(&self) -> &'static str {
        "File I/O Latency (file_summary_by_instance)"
    }

    fn headings(&self) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6} {:>6}|{:>8} {:>8}|{:>8} {:>6} {:>6} {:>6}|{}",
            "Latency",
            "%",
            "Read",
            "Write",
            "Misc",
            "Rd bytes",
            "Wr bytes",
            "Ops",
            "R Ops",
            "W Ops",
            "M Ops",
            "File Name"
        )
    }

    fn content(&self, row: &FileIoRow, totals: &FileIoRow) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6} {:>6}|{:>8} {:>8}|{:>8} {:>6} {:>6} {:>6}|{}",
            format_time(row.sum_timer_wait),
            format_pct(divide(row.sum_timer_wait, totals.sum_timer_wait)),
            format_pct(divide(row.sum_timer_read, row.sum_timer_wait)),
            format_pct(divide(row.sum_timer_write, row.sum_timer_wait)),
            format_pct(divide(row.sum_timer_misc, row.sum_timer_wait)),
            format_amount(row.sum_number_of_bytes_read),
            format_amount(row.sum_number_of_bytes_write),
            format_amount(row.count_star),
            format_pct(divide(row.count_read, row.count_star)),
            format_pct(divide(row.count_write, row.count_star)),
            format_pct(divide(row.count_misc, row.count_star)),
            display_name(row)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_and_op_shares_are_shown() {
        let row = FileIoRow {
            name: "<redo_log>".into(),
            sum_timer_wait: 1_000_000,
            sum_timer_write: 1_000_000,
            count_star: 4,
            count_write: 4,
            sum_number_of_bytes_write: 2_500_000,
            ..FileIoRow::default()
        };
        let line = FileIoFormat.content(&row, &row);
        assert!(line.contains(" 2.50 M|"));
        assert!(line.ends_with("|<redo_log>"));
        assert_eq!(line.matches("100.0%").count(), 3);
    }
}
