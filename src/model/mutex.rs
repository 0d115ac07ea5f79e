//! Mutex waits from `events_waits_summary_global_by_event_name`.

use super::metric_row;

metric_row! {
    pub struct MutexRow {
        wait: sum_timer_wait;
        count_star,
        sum_timer_wait,
    }
}
