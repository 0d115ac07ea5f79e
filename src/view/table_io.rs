//! Table I/O by latency and by operation count.

use std::cmp::Ordering;

use super::ViewKind;
use super::common::{RowFormat, display_name};
use crate::fmt::{divide, format_amount, format_pct, format_time};
use crate::model::TableIoRow;

/// Ranked by total wait time.
pub struct TableIoLatencyFormat;

impl RowFormat<TableIoRow> for TableIoLatencyFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::TableIoLatency
    }

    fn title(&self) -> &'static str {
        "Table Latency (table_io_waits_summary_by_table)"
    }

    fn headings(&self) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6} {:>6} {:>6}|{}",
            "Latency", "%", "Fetch", "Insert", "Update", "Delete", "Table Name"
        )
    }

    fn content(&self, row: &TableIoRow, totals: &TableIoRow) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6} {:>6} {:>6}|{}",
            format_time(row.sum_timer_wait),
            format_pct(divide(row.sum_timer_wait, totals.sum_timer_wait)),
            format_pct(divide(row.sum_timer_fetch, row.sum_timer_wait)),
            format_pct(divide(row.sum_timer_insert, row.sum_timer_wait)),
            format_pct(divide(row.sum_timer_update, row.sum_timer_wait)),
            format_pct(divide(row.sum_timer_delete, row.sum_timer_wait)),
            display_name(row)
        )
    }
}

/// Ranked by number of operations.
pub struct TableIoOpsFormat;

impl RowFormat<TableIoRow> for TableIoOpsFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::TableIoOps
    }

    fn title(&self) -> &'static str {
        "Table Ops (table_io_waits_summary_by_table)"
    }

    fn headings(&self) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6} {:>6} {:>6}|{}",
            "Ops", "%", "Fetch", "Insert", "Update", "Delete", "Table Name"
        )
    }

    fn content(&self, row: &TableIoRow, totals: &TableIoRow) -> String {
        format!(
            "{:>10} {:>6}|{:>6} {:>6} {:>6} {:>6}|{}",
            format_amount(row.count_star),
            format_pct(divide(row.count_star, totals.count_star)),
            format_pct(divide(row.count_fetch, row.count_star)),
            format_pct(divide(row.count_insert, row.count_star)),
            format_pct(divide(row.count_update, row.count_star)),
            format_pct(divide(row.count_delete, row.count_star)),
            display_name(row)
        )
    }

    fn rank(&self, a: &TableIoRow, b: &TableIoRow) -> Ordering {
        b.count_star
            .cmp(&a.count_star)
            .then_with(|| a.name.cmp(&b.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricRow;

    fn table(name: &str, wait: i64, fetch: i64, ops: i64) -> TableIoRow {
        TableIoRow {
            name: name.to_string(),
            sum_timer_wait: wait,
            sum_timer_fetch: fetch,
            count_star: ops,
            count_fetch: ops,
            ..TableIoRow::default()
        }
    }

    #[test]
    fn latency_line_shows_share_of_total() {
        let row = table("shop.orders", 2_000_000_000_000, 1_000_000_000_000, 10);
        let totals = table("Totals", 4_000_000_000_000, 0, 20);
        let line = TableIoLatencyFormat.content(&row, &totals);
        assert!(line.starts_with("    2.00 s  50.0%| 50.0%"));
        assert!(line.ends_with("|shop.orders"));
    }

    #[test]
    fn headings_and_rows_share_column_layout() {
        let row = table("a.b", 1_000, 1_000, 1);
        let headings = TableIoLatencyFormat.headings();
        let line = TableIoLatencyFormat.content(&row, &row);
        assert_eq!(headings.find('|'), line.find('|'));
    }

    #[test]
    fn ops_view_ranks_by_count() {
        let busy = table("a.busy", 10, 0, 900);
        let slow = table("a.slow", 10_000, 0, 3);
        assert_eq!(TableIoOpsFormat.rank(&busy, &slow), Ordering::Less);
        assert_eq!(TableIoLatencyFormat.rank(&busy, &slow), Ordering::Greater);
    }

    #[test]
    fn empty_row_hides_name() {
        let line = TableIoOpsFormat.content(&TableIoRow::named("x.y"), &TableIoRow::default());
        assert!(line.ends_with('|'));
    }
}
