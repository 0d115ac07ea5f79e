//! One [`DataSource`] adapter per metric domain.
//!
//! Every adapter issues a single query through the shared client, maps
//! columns by position (see `queries.rs` for the column order), rewrites
//! names and folds rows that end up with the same name.

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use mysql::Row;
use tracing::debug;

use super::file_names::FileNameSimplifier;
use super::mysql_client::{SharedClient, column, counter, text};
use super::queries::{self, MUTEX_PREFIX, STAGE_PREFIX};
use super::traits::{CollectError, DataSource};
use super::DatabaseFilter;
use crate::model::{
    FileIoRow, MutexRow, StageRow, TableIoRow, TableLockRow, UserRow, merge_by_name,
};
use crate::munge::{NameKind, NameRewriter};

/// Picoseconds per second; processlist `TIME` is in seconds.
const PS_PER_SECOND: i64 = 1_000_000_000_000;

fn fetch_rows(
    client: &SharedClient,
    sql: &str,
    args: &[String],
) -> Result<Vec<Row>, CollectError> {
    client.borrow_mut().query_rows(sql, args)
}

/// `table_io_waits_summary_by_table`, shared by the latency and ops views.
pub struct TableIoSource {
    client: SharedClient,
    rewriter: Rc<NameRewriter>,
    filter: DatabaseFilter,
    sql: String,
}

impl TableIoSource {
    pub fn new(client: SharedClient, rewriter: Rc<NameRewriter>, filter: DatabaseFilter) -> Self {
        let sql = queries::with_database_filter(queries::TABLE_IO, &filter);
        Self {
            client,
            rewriter,
            filter,
            sql,
        }
    }

    fn map(&self, row: &Row) -> Result<TableIoRow, CollectError> {
        Ok(TableIoRow {
            name: self.rewriter.table_name(&text(row, 0)?, &text(row, 1)?),
            count_star: counter(row, 2)?,
            sum_timer_wait: counter(row, 3)?,
            count_read: counter(row, 4)?,
            sum_timer_read: counter(row, 5)?,
            count_write: counter(row, 6)?,
            sum_timer_write: counter(row, 7)?,
            count_fetch: counter(row, 8)?,
            sum_timer_fetch: counter(row, 9)?,
            count_insert: counter(row, 10)?,
            sum_timer_insert: counter(row, 11)?,
            count_update: counter(row, 12)?,
            sum_timer_update: counter(row, 13)?,
            count_delete: counter(row, 14)?,
            sum_timer_delete: counter(row, 15)?,
        })
    }
}

impl DataSource<TableIoRow> for TableIoSource {
    fn fetch(&mut self) -> Result<Vec<TableIoRow>, CollectError> {
        let raw = fetch_rows(&self.client, &self.sql, self.filter.args())?;
        let rows = raw.iter().map(|r| self.map(r)).collect::<Result<Vec<_>, _>>()?;
        Ok(merge_by_name(rows))
    }
}

/// `table_lock_waits_summary_by_table`.
pub struct TableLockSource {
    client: SharedClient,
    rewriter: Rc<NameRewriter>,
    filter: DatabaseFilter,
    sql: String,
}

impl TableLockSource {
    pub fn new(client: SharedClient, rewriter: Rc<NameRewriter>, filter: DatabaseFilter) -> Self {
        let sql = queries::with_database_filter(queries::TABLE_LOCKS, &filter);
        Self {
            client,
            rewriter,
            filter,
            sql,
        }
    }

    fn map(&self, row: &Row) -> Result<TableLockRow, CollectError> {
        Ok(TableLockRow {
            name: self.rewriter.table_name(&text(row, 0)?, &text(row, 1)?),
            count_star: counter(row, 2)?,
            sum_timer_wait: counter(row, 3)?,
            sum_timer_read: counter(row, 4)?,
            sum_timer_write: counter(row, 5)?,
            sum_timer_read_with_shared_locks: counter(row, 6)?,
            sum_timer_read_high_priority: counter(row, 7)?,
            sum_timer_read_no_insert: counter(row, 8)?,
            sum_timer_read_normal: counter(row, 9)?,
            sum_timer_read_external: counter(row, 10)?,
            sum_timer_write_allow_write: counter(row, 11)?,
            sum_timer_write_concurrent_insert: counter(row, 12)?,
            sum_timer_write_low_priority: counter(row, 13)?,
            sum_timer_write_normal: counter(row, 14)?,
            sum_timer_write_external: counter(row, 15)?,
        })
    }
}

impl DataSource<TableLockRow> for TableLockSource {
    fn fetch(&mut self) -> Result<Vec<TableLockRow>, CollectError> {
        let raw = fetch_rows(&self.client, &self.sql, self.filter.args())?;
        let rows = raw.iter().map(|r| self.map(r)).collect::<Result<Vec<_>, _>>()?;
        Ok(merge_by_name(rows))
    }
}

/// `file_summary_by_instance`, with simplified file names.
pub struct FileIoSource {
    client: SharedClient,
    rewriter: Rc<NameRewriter>,
    simplifier: FileNameSimplifier,
}

impl FileIoSource {
    pub fn new(
        client: SharedClient,
        rewriter: Rc<NameRewriter>,
        simplifier: FileNameSimplifier,
    ) -> Self {
        Self {
            client,
            rewriter,
            simplifier,
        }
    }

    fn display_name(&mut self, path: &str) -> String {
        let simplified = self.simplifier.simplify(path);
        if simplified.starts_with('<') {
            self.rewriter.rules.munge(&simplified)
        } else {
            self.rewriter.name(NameKind::File, &simplified)
        }
    }
}

impl DataSource<FileIoRow> for FileIoSource {
    fn fetch(&mut self) -> Result<Vec<FileIoRow>, CollectError> {
        let raw = fetch_rows(&self.client, queries::FILE_IO, &[])?;
        let mut rows = Vec::with_capacity(raw.len());
        for row in &raw {
            rows.push(FileIoRow {
                name: self.display_name(&text(row, 0)?),
                count_star: counter(row, 1)?,
                sum_timer_wait: counter(row, 2)?,
                count_read: counter(row, 3)?,
                sum_timer_read: counter(row, 4)?,
                sum_number_of_bytes_read: counter(row, 5)?,
                count_write: counter(row, 6)?,
                sum_timer_write: counter(row, 7)?,
                sum_number_of_bytes_write: counter(row, 8)?,
                count_misc: counter(row, 9)?,
                sum_timer_misc: counter(row, 10)?,
            });
        }
        let merged = merge_by_name(rows);
        debug!("{} raw file row(s) merged into {}", raw.len(), merged.len());
        Ok(merged)
    }
}

/// Event name with `prefix` removed, or unchanged if it does not start with it.
fn event_name(name: &str, prefix: &str) -> String {
    match name.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => name.to_string(),
    }
}

/// `events_waits_summary_global_by_event_name` for mutexes.
pub struct MutexSource {
    client: SharedClient,
    rewriter: Rc<NameRewriter>,
}

impl MutexSource {
    pub fn new(client: SharedClient, rewriter: Rc<NameRewriter>) -> Self {
        Self { client, rewriter }
    }
}

impl DataSource<MutexRow> for MutexSource {
    fn fetch(&mut self) -> Result<Vec<MutexRow>, CollectError> {
        let raw = fetch_rows(&self.client, queries::MUTEX, &[])?;
        let mut rows = Vec::with_capacity(raw.len());
        for row in &raw {
            rows.push(MutexRow {
                name: self.rewriter.rules.munge(&event_name(&text(row, 0)?, MUTEX_PREFIX)),
                count_star: counter(row, 1)?,
                sum_timer_wait: counter(row, 2)?,
            });
        }
        Ok(merge_by_name(rows))
    }
}

/// `events_stages_summary_global_by_event_name`.
pub struct StagesSource {
    client: SharedClient,
    rewriter: Rc<NameRewriter>,
}

impl StagesSource {
    pub fn new(client: SharedClient, rewriter: Rc<NameRewriter>) -> Self {
        Self { client, rewriter }
    }
}

impl DataSource<StageRow> for StagesSource {
    fn fetch(&mut self) -> Result<Vec<StageRow>, CollectError> {
        let raw = fetch_rows(&self.client, queries::STAGES, &[])?;
        let mut rows = Vec::with_capacity(raw.len());
        for row in &raw {
            rows.push(StageRow {
                name: self.rewriter.rules.munge(&event_name(&text(row, 0)?, STAGE_PREFIX)),
                count_star: counter(row, 1)?,
                sum_timer_wait: counter(row, 2)?,
            });
        }
        Ok(merge_by_name(rows))
    }
}

/// One `information_schema.processlist` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProcessEntry {
    pub id: u64,
    pub user: String,
    pub host: String,
    pub db: String,
    pub command: String,
    pub time: i64,
    pub info: String,
}

impl ProcessEntry {
    fn from_row(row: &Row) -> Result<Self, CollectError> {
        Ok(Self {
            id: column::<u64>(row, 0)?.unwrap_or(0),
            user: text(row, 1)?,
            host: text(row, 2)?,
            db: text(row, 3)?,
            command: text(row, 4)?,
            time: column::<i64>(row, 5)?.unwrap_or(0),
            info: text(row, 7)?,
        })
    }

    fn is_sleeping(&self) -> bool {
        self.command == "Sleep"
    }
}

/// Host part of `host:port`.
fn host_only(host: &str) -> &str {
    host.rsplit_once(':').map_or(host, |(h, _)| h)
}

#[derive(Default)]
struct UserAccumulator {
    row: UserRow,
    hosts: HashSet<String>,
    dbs: HashSet<String>,
}

/// Groups processlist entries per (rewritten) user name, skipping `own_id`.
///
/// Output is ordered by user name.
pub(crate) fn aggregate_processlist(
    entries: &[ProcessEntry],
    own_id: u64,
    rewriter: &NameRewriter,
) -> Vec<UserRow> {
    let mut users: BTreeMap<String, UserAccumulator> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.id != own_id) {
        let name = rewriter.name(NameKind::User, &entry.user);
        let acc = users.entry(name.clone()).or_default();
        acc.row.name = name;
        acc.row.connections += 1;

        let elapsed = entry.time.max(0).saturating_mul(PS_PER_SECOND);
        if entry.is_sleeping() {
            acc.row.sleeptime = acc.row.sleeptime.saturating_add(elapsed);
        } else {
            acc.row.runtime = acc.row.runtime.saturating_add(elapsed);
            acc.row.active += 1;
        }

        let host = host_only(&entry.host);
        if !host.is_empty() {
            acc.hosts.insert(rewriter.name(NameKind::Host, host));
        }
        if !entry.db.is_empty() {
            acc.dbs.insert(rewriter.name(NameKind::Schema, &entry.db));
        }

        let statement = entry.info.trim_start();
        if !statement.is_empty() {
            let verb = statement
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_ascii_uppercase();
            match verb.as_str() {
                "SELECT" => acc.row.selects += 1,
                "INSERT" | "REPLACE" => acc.row.inserts += 1,
                "UPDATE" => acc.row.updates += 1,
                "DELETE" => acc.row.deletes += 1,
                _ => acc.row.other += 1,
            }
        }
    }

    users
        .into_values()
        .map(|mut acc| {
            acc.row.hosts = acc.hosts.len() as i64;
            acc.row.dbs = acc.dbs.len() as i64;
            acc.row
        })
        .collect()
}

/// `information_schema.processlist`, aggregated per user.
pub struct UserSource {
    client: SharedClient,
    rewriter: Rc<NameRewriter>,
    filter: DatabaseFilter,
}

impl UserSource {
    pub fn new(client: SharedClient, rewriter: Rc<NameRewriter>, filter: DatabaseFilter) -> Self {
        Self {
            client,
            rewriter,
            filter,
        }
    }
}

impl DataSource<UserRow> for UserSource {
    fn fetch(&mut self) -> Result<Vec<UserRow>, CollectError> {
        let raw = fetch_rows(&self.client, queries::PROCESSLIST, &[])?;
        let own_id = self.client.borrow().connection_id();
        let mut entries = raw
            .iter()
            .map(ProcessEntry::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        if !self.filter.is_empty() {
            entries.retain(|e| self.filter.args().contains(&e.db));
        }
        Ok(aggregate_processlist(&entries, own_id, &self.rewriter))
    }
}
