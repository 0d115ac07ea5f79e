//! Mutex wait latency.

use super::ViewKind;
use super::common::{RowFormat, display_name};
use crate::fmt::{divide, format_amount, format_pct, format_time};
use crate::model::MutexRow;

pub struct MutexFormat;

impl RowFormat<MutexRow> for MutexFormat {
    fn kind(&self) -> ViewKind {
        ViewKind::MutexLatency
    }

    fn title(&self) -> &'static str {
        "Mutex Latency (events_waits_summary_global_by_event_name)"
    }

    fn headings(&self) -> String {
        format!("{:>10} {:>8} {:>6}|{}", "Latency", "MtxCnt", "%", "Mutex Name")
    }

    fn content(&self, row: &MutexRow, totals: &MutexRow) -> String {
        format!(
            "{:>10} {:>8} {:>6}|{}",
            format_time(row.sum_timer_wait),
            format_amount(row.count_star),
            format_pct(divide(row.sum_timer_wait, totals.sum_timer_wait)),
            display_name(row)
        )
    }
}
