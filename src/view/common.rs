//! Generic [`MetricView`] shared by every domain.
//!
//! A domain only supplies a [`RowFormat`]: its headings, how one row turns
//! into a line, and optionally a ranking rule. Baseline handling, relative
//! mode and totals live here once.

use std::cmp::Ordering;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::{MetricView, ViewKind};
use crate::collector::{CollectError, DataSource};
use crate::model::{MetricRow, Snapshot, TOTALS_NAME, totals};

/// Per-domain presentation rules.
pub trait RowFormat<R: MetricRow> {
    fn kind(&self) -> ViewKind;

    /// Leading part of the description line, e.g. the source table.
    fn title(&self) -> &'static str;

    fn headings(&self) -> String;

    /// Formats `row`; percentages are relative to `totals`.
    fn content(&self, row: &R, totals: &R) -> String;

    /// Display order: most wait time first, then by name.
    fn rank(&self, a: &R, b: &R) -> Ordering {
        b.wait_time()
            .cmp(&a.wait_time())
            .then_with(|| a.name().cmp(b.name()))
    }

    fn have_relative_stats(&self) -> bool {
        true
    }
}

/// Name column text: blank for a row without data, except the totals row.
pub(crate) fn display_name<R: MetricRow>(row: &R) -> &str {
    if row.has_data() || row.name() == TOTALS_NAME {
        row.name()
    } else {
        ""
    }
}

/// A metric domain with its baseline and current results.
pub struct DomainView<R, F> {
    format: F,
    source: Box<dyn DataSource<R>>,
    /// Latest raw snapshot.
    current: Option<Snapshot<R>>,
    baseline: Option<Snapshot<R>>,
    /// Displayed rows: relative or raw, with data, ranked.
    results: Vec<R>,
    totals: R,
    want_relative: bool,
    /// Set once the server counters fall behind the baseline.
    baseline_stale: bool,
    first_collected: Option<DateTime<Local>>,
    last_collected: Option<DateTime<Local>>,
}

impl<R: MetricRow, F: RowFormat<R>> DomainView<R, F> {
    pub fn new(format: F, source: Box<dyn DataSource<R>>) -> Self {
        Self {
            format,
            source,
            current: None,
            baseline: None,
            results: Vec::new(),
            totals: R::named(TOTALS_NAME),
            want_relative: false,
            baseline_stale: false,
            first_collected: None,
            last_collected: None,
        }
    }

    /// Rows currently displayed, in ranking order.
    pub fn results(&self) -> &[R] {
        &self.results
    }

    pub fn totals(&self) -> &R {
        &self.totals
    }

    fn showing_relative(&self) -> bool {
        self.want_relative && self.format.have_relative_stats()
    }

    fn make_results(&mut self) {
        let Some(current) = &self.current else {
            return;
        };
        let rows = match &self.baseline {
            Some(baseline) if self.showing_relative() => current.subtract(baseline).rows,
            _ => current.rows.clone(),
        };

        self.totals = totals(&rows);
        let mut results: Vec<R> = rows.into_iter().filter(|r| r.has_data()).collect();
        results.sort_by(|a, b| self.format.rank(a, b));
        self.results = results;
    }
}

impl<R: MetricRow, F: RowFormat<R>> MetricView for DomainView<R, F> {
    fn kind(&self) -> ViewKind {
        self.format.kind()
    }

    fn collect(&mut self) -> Result<(), CollectError> {
        let snapshot = Snapshot::new(self.source.fetch()?);
        debug!(
            "{}: collected {} row(s)",
            self.format.kind(),
            snapshot.rows.len()
        );

        if self.first_collected.is_none() {
            self.first_collected = Some(snapshot.collected_at);
        }
        if self.format.have_relative_stats() {
            match &self.baseline {
                None => self.baseline = Some(snapshot.clone()),
                Some(baseline) if !self.baseline_stale && snapshot.needs_refresh(baseline) => {
                    self.baseline_stale = true;
                    warn!(
                        "{}: counters went backwards since the baseline, \
                         server statistics were probably reset",
                        self.format.kind()
                    );
                }
                Some(_) => {}
            }
        }

        self.last_collected = Some(snapshot.collected_at);
        self.current = Some(snapshot);
        self.make_results();
        Ok(())
    }

    fn reset_statistics(&mut self) {
        if self.format.have_relative_stats() {
            self.baseline = self.current.clone();
            self.baseline_stale = false;
        }
        self.first_collected = Some(Local::now());
        self.make_results();
    }

    fn headings(&self) -> String {
        self.format.headings()
    }

    fn row_content(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|row| self.format.content(row, &self.totals))
            .collect()
    }

    fn total_row_content(&self) -> String {
        self.format.content(&self.totals, &self.totals)
    }

    fn empty_row_content(&self) -> String {
        let empty = R::default();
        self.format.content(&empty, &empty)
    }

    fn description(&self) -> String {
        format!("{} {} rows", self.format.title(), self.results.len())
    }

    fn have_relative_stats(&self) -> bool {
        self.format.have_relative_stats()
    }

    fn want_relative_stats(&self) -> bool {
        self.want_relative
    }

    fn set_want_relative_stats(&mut self, want: bool) {
        if self.want_relative != want {
            self.want_relative = want;
            self.make_results();
        }
    }

    fn first_collected(&self) -> Option<DateTime<Local>> {
        self.first_collected
    }

    fn last_collected(&self) -> Option<DateTime<Local>> {
        self.last_collected
    }
}
