//! `performance_schema.table_io_waits_summary_by_table`.

use super::metric_row;

metric_row! {
    /// Table I/O counters for one (possibly munged) `schema.table`.
    pub struct TableIoRow {
        wait: sum_timer_wait;
        sum_timer_wait,
        sum_timer_fetch,
        sum_timer_insert,
        sum_timer_update,
        sum_timer_delete,
        sum_timer_read,
        sum_timer_write,
        count_star,
        count_fetch,
        count_insert,
        count_update,
        count_delete,
        count_read,
        count_write,
    }
}
