//! Metric views: one uniform contract over every metric domain.
//!
//! Each view wraps a [`DataSource`] behind [`MetricView`], keeps its own
//! baseline and produces ready-formatted text lines. The control loop only
//! ever sees `Box<dyn MetricView>` held by a [`ViewRegistry`].

mod common;
mod file_io;
mod mutex;
mod registry;
mod stages;
mod table_io;
mod table_locks;
mod users;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::collector::{
    CollectError, DataSource, DatabaseFilter, FileIoSource, FileNameSimplifier, MutexSource,
    SharedClient, StagesSource, TableIoSource, TableLockSource, UserSource,
};
use crate::munge::NameRewriter;

pub use common::{DomainView, RowFormat};
pub use file_io::FileIoFormat;
pub use mutex::MutexFormat;
pub use registry::ViewRegistry;
pub use stages::StagesFormat;
pub use table_io::{TableIoLatencyFormat, TableIoOpsFormat};
pub use table_locks::TableLockFormat;
pub use users::UserFormat;

/// The metric views, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewKind {
    #[default]
    TableIoLatency,
    TableIoOps,
    FileIoLatency,
    TableLockLatency,
    UserLatency,
    MutexLatency,
    StagesLatency,
}

impl ViewKind {
    pub fn all() -> &'static [ViewKind] {
        &[
            ViewKind::TableIoLatency,
            ViewKind::TableIoOps,
            ViewKind::FileIoLatency,
            ViewKind::TableLockLatency,
            ViewKind::UserLatency,
            ViewKind::MutexLatency,
            ViewKind::StagesLatency,
        ]
    }

    /// Name accepted by `--view`.
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::TableIoLatency => "table_io_latency",
            ViewKind::TableIoOps => "table_io_ops",
            ViewKind::FileIoLatency => "file_io_latency",
            ViewKind::TableLockLatency => "table_lock_latency",
            ViewKind::UserLatency => "user_latency",
            ViewKind::MutexLatency => "mutex_latency",
            ViewKind::StagesLatency => "stages_latency",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `--view` value that names no known view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl fmt::Display for UnknownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = ViewKind::all().iter().map(ViewKind::name).collect();
        write!(
            f,
            "unknown view {:?}, expected one of: {}",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownView {}

impl FromStr for ViewKind {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewKind::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Uniform contract over one metric domain.
pub trait MetricView {
    fn kind(&self) -> ViewKind;

    /// Fetches a fresh snapshot and recomputes the displayed rows.
    ///
    /// Any error is fatal for the caller; the previous results are kept.
    fn collect(&mut self) -> Result<(), CollectError>;

    /// Makes the latest raw snapshot the new baseline. Does not fetch.
    fn reset_statistics(&mut self);

    fn headings(&self) -> String;

    /// One line per row with data, in ranking order.
    fn row_content(&self) -> Vec<String>;

    fn total_row_content(&self) -> String;

    /// Blank filler line with the same column layout.
    fn empty_row_content(&self) -> String;

    fn description(&self) -> String;

    /// False for domains whose values are not monotonic counters.
    fn have_relative_stats(&self) -> bool;

    fn want_relative_stats(&self) -> bool;

    fn set_want_relative_stats(&mut self, want: bool);

    /// Time of the first collection, or of the last statistics reset.
    fn first_collected(&self) -> Option<DateTime<Local>>;

    fn last_collected(&self) -> Option<DateTime<Local>>;
}

/// Everything the standard set of views needs from the outside world.
pub struct ViewSources {
    pub client: SharedClient,
    pub rewriter: Rc<NameRewriter>,
    pub filter: DatabaseFilter,
    pub simplifier: FileNameSimplifier,
}

fn boxed<R, F>(format: F, source: impl DataSource<R> + 'static) -> Box<dyn MetricView>
where
    R: crate::model::MetricRow + 'static,
    F: RowFormat<R> + 'static,
{
    Box::new(DomainView::new(format, Box::new(source)))
}

/// Builds every view in [`ViewKind::all`] order against the live server.
pub fn standard_views(sources: ViewSources) -> Vec<Box<dyn MetricView>> {
    let ViewSources {
        client,
        rewriter,
        filter,
        simplifier,
    } = sources;

    vec![
        boxed(
            TableIoLatencyFormat,
            TableIoSource::new(client.clone(), rewriter.clone(), filter.clone()),
        ),
        boxed(
            TableIoOpsFormat,
            TableIoSource::new(client.clone(), rewriter.clone(), filter.clone()),
        ),
        boxed(
            FileIoFormat,
            FileIoSource::new(client.clone(), rewriter.clone(), simplifier),
        ),
        boxed(
            TableLockFormat,
            TableLockSource::new(client.clone(), rewriter.clone(), filter.clone()),
        ),
        boxed(
            UserFormat,
            UserSource::new(client.clone(), rewriter.clone(), filter),
        ),
        boxed(MutexFormat, MutexSource::new(client.clone(), rewriter.clone())),
        boxed(StagesFormat, StagesSource::new(client, rewriter)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_names_round_trip() {
        for kind in ViewKind::all() {
            assert_eq!(kind.name().parse::<ViewKind>(), Ok(*kind));
        }
    }

    #[test]
    fn unknown_view_lists_choices() {
        let err = "io".parse::<ViewKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"io\""));
        assert!(msg.contains("stages_latency"));
    }

    #[test]
    fn default_view_is_first() {
        assert_eq!(ViewKind::default(), ViewKind::all()[0]);
    }
}
