//! `performance_schema.file_summary_by_instance`.

use super::metric_row;

metric_row! {
    /// File I/O counters for one simplified file name.
    pub struct FileIoRow {
        wait: sum_timer_wait;
        sum_timer_wait,
        sum_timer_read,
        sum_timer_write,
        sum_timer_misc,
        count_star,
        count_read,
        count_write,
        count_misc,
        sum_number_of_bytes_read,
        sum_number_of_bytes_write,
    }
}
