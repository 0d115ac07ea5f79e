//! Statement stage latency.

use super::ViewKind;
use super::common::{RowFormat, display_name};
use crate::fmt::{divide, format_amount, format_pct, format_time};
use crate::model::StageRow;

pub struct StagesFormat;

impl RowFormat<StageRow> for StagesFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::StagesLatency
    }

    fn title(&self) -> &'static str {
        "SQL Stage Latency (events_stages_summary_global_by_event_name)"
    }

    fn headings(&self) -> String {
        format!("{:>10} {:>6} {:>8}|{}", "Latency", "%", "Counter", "Stage Name")
    }

    fn content(&self, row: &StageRow, totals: &StageRow) -> String {
        format!(
            "{:>10} {:>6} {:>8}|{}",
            format_time(row.sum_timer_wait),
            format_pct(divide(row.sum_timer_wait, totals.sum_timer_wait)),
            format_amount(row.count_star),
            display_name(row)
        )
    }
}
