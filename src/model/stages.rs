//! `performance_schema.events_stages_summary_global_by_event_name`.

use super::metric_row;

metric_row! {
    pub struct StageRow {
        wait: sum_timer_wait;
        count_star,
        sum_timer_wait,
    }
}
