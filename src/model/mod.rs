//! Row snapshots and the delta engine shared by every metric domain.
//!
//! Each performance_schema table is modelled as a row type with a name and a
//! set of signed counters. Domains declare their field list with
//! [`metric_row!`]; totals, subtraction against a baseline and refresh
//! detection are implemented once here over the [`MetricRow`] capability.

use std::collections::HashMap;

use chrono::{DateTime, Local};

pub mod file_io;
pub mod mutex;
pub mod stages;
pub mod table_io;
pub mod table_locks;
pub mod users;

pub use file_io::FileIoRow;
pub use mutex::MutexRow;
pub use stages::StageRow;
pub use table_io::TableIoRow;
pub use table_locks::TableLockRow;
pub use users::UserRow;

/// Name given to the synthetic row produced by [`totals`].
pub const TOTALS_NAME: &str = "Totals";

/// Capability set needed by the delta engine: an identity key and a way to
/// combine every numeric field with the same field of another row.
pub trait MetricRow: Clone + Default + std::fmt::Debug {
    /// Stable identity key (e.g. `schema.table`, a file name, a stage).
    fn name(&self) -> &str;

    /// Returns an all-zero row with the given name.
    fn named(name: &str) -> Self;

    /// Accumulated wait time in picoseconds, used for ranking and refresh checks.
    fn wait_time(&self) -> i64;

    /// Applies `op(self.field, other.field)` to every numeric field.
    fn combine(&mut self, other: &Self, op: fn(i64, i64) -> i64);

    /// True if any numeric field is non-zero.
    fn has_data(&self) -> bool;
}

/// Declares a domain row: a `name` plus `i64` counters, and implements
/// [`MetricRow`] over the listed fields. `wait` names the field holding the
/// total wait time.
macro_rules! metric_row {
    (
        $(#[$meta:meta])*
        pub struct $row:ident {
            wait: $wait:ident;
            $( $(#[$fmeta:meta])* $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $row {
            pub name: String,
            $( $(#[$fmeta])* pub $field: i64, )+
        }

        impl $crate::model::MetricRow for $row {
            fn name(&self) -> &str {
                &self.name
            }

            fn named(name: &str) -> Self {
                Self {
                    name: name.to_string(),
                    ..Self::default()
                }
            }

            fn wait_time(&self) -> i64 {
                self.$wait
            }

            fn combine(&mut self, other: &Self, op: fn(i64, i64) -> i64) {
                $( self.$field = op(self.$field, other.$field); )+
            }

            fn has_data(&self) -> bool {
                false $( || self.$field != 0 )+
            }
        }
    };
}

pub(crate) use metric_row;

/// Rows of one domain captured in a single round trip.
#[derive(Debug, Clone)]
pub struct Snapshot<R> {
    pub rows: Vec<R>,
    pub collected_at: DateTime<Local>,
}

impl<R: MetricRow> Snapshot<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            collected_at: Local::now(),
        }
    }

    pub fn totals(&self) -> R {
        totals(&self.rows)
    }

    /// Returns a snapshot holding `self - baseline`, see [`subtract`].
    pub fn subtract(&self, baseline: &Snapshot<R>) -> Snapshot<R> {
        Snapshot {
            rows: subtract(&self.rows, &baseline.rows),
            collected_at: self.collected_at,
        }
    }

    /// True when `other` carries strictly more accumulated wait time than `self`.
    pub fn needs_refresh(&self, other: &Snapshot<R>) -> bool {
        needs_refresh(&self.rows, &other.rows)
    }
}

/// Sums every numeric field over `rows` into a row named [`TOTALS_NAME`].
pub fn totals<R: MetricRow>(rows: &[R]) -> R {
    let mut total = R::named(TOTALS_NAME);
    for row in rows {
        total.combine(row, i64::wrapping_add);
    }
    total
}

/// Subtracts `baseline` from `current`, matching rows by name.
///
/// Rows without a baseline counterpart are kept at their full value, rows only
/// present in the baseline are dropped, and the order of `current` is kept.
/// Results are not clamped: a server-side counter reset shows up as negative
/// values.
pub fn subtract<R: MetricRow>(current: &[R], baseline: &[R]) -> Vec<R> {
    let by_name: HashMap<&str, &R> = baseline.iter().map(|r| (r.name(), r)).collect();

    current
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(initial) = by_name.get(row.name()) {
                row.combine(initial, i64::wrapping_sub);
            }
            row
        })
        .collect()
}

/// True when `b` has accumulated strictly more wait time than `a`.
pub fn needs_refresh<R: MetricRow>(a: &[R], b: &[R]) -> bool {
    totals(b).wait_time() > totals(a).wait_time()
}

/// Folds rows sharing a name into one, keeping first-seen order.
///
/// Needed after name munging or file name simplification, when several raw
/// rows map to the same display name.
pub fn merge_by_name<R: MetricRow>(rows: Vec<R>) -> Vec<R> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    let mut merged: Vec<R> = Vec::with_capacity(rows.len());

    for row in rows {
        match index.get(row.name()) {
            Some(&i) => merged[i].combine(&row, i64::wrapping_add),
            None => {
                index.insert(row.name().to_string(), merged.len());
                merged.push(row);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    metric_row! {
        pub struct TestRow {
            wait: wait;
            wait,
            count,
        }
    }

    fn row(name: &str, wait: i64, count: i64) -> TestRow {
        TestRow {
            name: name.to_string(),
            wait,
            count,
        }
    }

    #[test]
    fn totals_sums_every_field() {
        let rows = vec![row("a", 10, 1), row("b", 20, 2), row("c", 30, 3)];
        let total = totals(&rows);
        assert_eq!(total, row(TOTALS_NAME, 60, 6));
    }

    #[test]
    fn totals_of_empty_is_zero() {
        let total = totals::<TestRow>(&[]);
        assert_eq!(total.name, TOTALS_NAME);
        assert!(!total.has_data());
    }

    #[test]
    fn totals_of_totals_is_fixed_point() {
        let rows = vec![row("a", 7, 3), row("b", 5, 11)];
        let total = totals(&rows);
        assert_eq!(totals(std::slice::from_ref(&total)), total);
    }

    #[test]
    fn subtract_totals_match_difference_of_totals() {
        let baseline = vec![row("a", 100, 10), row("b", 50, 5)];
        let current = vec![row("b", 80, 9), row("a", 150, 12)];

        let diff = subtract(&current, &baseline);
        let expected = {
            let mut t = totals(&current);
            t.combine(&totals(&baseline), i64::wrapping_sub);
            t
        };
        assert_eq!(totals(&diff), expected);
        assert_eq!(diff[0], row("b", 30, 4));
        assert_eq!(diff[1], row("a", 50, 2));
    }

    #[test]
    fn subtract_keeps_unmatched_rows_at_full_value() {
        let baseline = vec![row("a", 100, 10)];
        let current = vec![row("a", 120, 10), row("new", 40, 4)];

        let diff = subtract(&current, &baseline);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[1], row("new", 40, 4));
    }

    #[test]
    fn subtract_drops_rows_only_in_baseline() {
        let baseline = vec![row("gone", 100, 10), row("a", 1, 1)];
        let current = vec![row("a", 2, 2)];

        let diff = subtract(&current, &baseline);
        assert_eq!(diff, vec![row("a", 1, 1)]);
    }

    #[test]
    fn subtract_surfaces_counter_reset_as_negative() {
        let baseline = vec![row("t1", 1_000, 10)];
        let current = vec![row("t1", 200, 2)];

        let diff = subtract(&current, &baseline);
        assert_eq!(diff[0], row("t1", -800, -8));
        assert!(diff[0].has_data());
    }

    #[test]
    fn needs_refresh_follows_increasing_wait_time() {
        let s1 = vec![row("a", 10, 1)];
        let s2 = vec![row("a", 20, 1)];
        let s3 = vec![row("a", 15, 1), row("b", 25, 1)];

        assert!(needs_refresh(&s1, &s2));
        assert!(needs_refresh(&s2, &s3));
        assert!(!needs_refresh(&s2, &s1));
        assert!(!needs_refresh(&s3, &s2));
        assert!(!needs_refresh(&s1, &s1));
    }

    #[test]
    fn snapshot_subtract_keeps_collection_time_of_current() {
        let baseline = Snapshot::new(vec![row("a", 1, 1)]);
        let current = Snapshot::new(vec![row("a", 3, 1)]);
        let diff = current.subtract(&baseline);
        assert_eq!(diff.collected_at, current.collected_at);
        assert_eq!(diff.rows, vec![row("a", 2, 0)]);
        assert!(baseline.needs_refresh(&current));
    }

    #[test]
    fn merge_by_name_sums_duplicates_in_first_seen_order() {
        let rows = vec![
            row("db.t_20240101", 1, 1),
            row("db.other", 5, 5),
            row("db.t_20240101", 2, 2),
        ];
        let merged = merge_by_name(rows);
        assert_eq!(merged, vec![row("db.t_20240101", 3, 3), row("db.other", 5, 5)]);
    }
}
