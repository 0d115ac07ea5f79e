//! Table lock latency, split by lock type.

use super::ViewKind;
use super::common::{RowFormat, display_name};
use crate::fmt::{divide, format_pct, format_time};
use crate::model::TableLockRow;

pub struct TableLockFormat;

impl RowFormat<TableLockRow> for TableLockFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::TableLockLatency
    }

    fn title(&self) -> &'static str {
        "Locks by Table Name (table_lock_waits_summary_by_table)"
    }

    fn headings(&self) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6}|{:>6} {:>6} {:>6} {:>6} {:>6}|{:>6} {:>6} {:>6} {:>6} {:>6}|{}",
            "Latency",
            "%",
            "Read",
            "Write",
            "S.Lock",
            "High",
            "NoIns",
            "Normal",
            "Extrnl",
            "AlloWr",
            "CncIns",
            "Low",
            "Normal",
            "Extrnl",
            "Table Name"
        )
    }

    fn content(&self, row: &TableLockRow, totals: &TableLockRow) -> String {
        let share = |v: i64| format_pct(divide(v, row.sum_timer_wait));
        format!(
            "{:>10} {:>6}|{:>6} {:>6}|{:>6} {:>6} {:>6} {:>6} {:>6}|{:>6} {:>6} {:>6} {:>6} {:>6}|{}",
            format_time(row.sum_timer_wait),
            format_pct(divide(row.sum_timer_wait, totals.sum_timer_wait)),
            share(row.sum_timer_read),
            share(row.sum_timer_write),
            share(row.sum_timer_read_with_shared_locks),
            share(row.sum_timer_read_high_priority),
            share(row.sum_timer_read_no_insert),
            share(row.sum_timer_read_normal),
            share(row.sum_timer_read_external),
            share(row.sum_timer_write_allow_write),
            share(row.sum_timer_write_concurrent_insert),
            share(row.sum_timer_write_low_priority),
            share(row.sum_timer_write_normal),
            share(row.sum_timer_write_external),
            display_name(row)
        )
    }
}
