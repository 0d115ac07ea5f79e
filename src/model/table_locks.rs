//! `performance_schema.table_lock_waits_summary_by_table`.

use super::metric_row;

metric_row! {
    /// Lock wait timers for one table, split by lock type.
    pub struct TableLockRow {
        wait: sum_timer_wait;
        count_star,
        sum_timer_wait,
        sum_timer_read,
        sum_timer_write,
        sum_timer_read_with_shared_locks,
        sum_timer_read_high_priority,
        sum_timer_read_no_insert,
        sum_timer_read_normal,
        sum_timer_read_external,
        sum_timer_write_allow_write,
        sum_timer_write_concurrent_insert,
        sum_timer_write_low_priority,
        sum_timer_write_normal,
        sum_timer_write_external,
    }
}
