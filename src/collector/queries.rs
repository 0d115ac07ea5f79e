//! SQL text for each metric domain.
//!
//! Column order is part of the contract with the row mapping in `sources.rs`.

use super::DatabaseFilter;
use super::variables::VariablesTable;

/// Column holding the schema name in the per-table summaries.
pub const SCHEMA_COLUMN: &str = "OBJECT_SCHEMA";

pub const TABLE_IO: &str = r#"
SELECT OBJECT_SCHEMA, OBJECT_NAME,
       COUNT_STAR, SUM_TIMER_WAIT,
       COUNT_READ, SUM_TIMER_READ,
       COUNT_WRITE, SUM_TIMER_WRITE,
       COUNT_FETCH, SUM_TIMER_FETCH,
       COUNT_INSERT, SUM_TIMER_INSERT,
       COUNT_UPDATE, SUM_TIMER_UPDATE,
       COUNT_DELETE, SUM_TIMER_DELETE
FROM performance_schema.table_io_waits_summary_by_table
WHERE SUM_TIMER_WAIT > 0"#;

pub const TABLE_LOCKS: &str = r#"
SELECT OBJECT_SCHEMA, OBJECT_NAME,
       COUNT_STAR, SUM_TIMER_WAIT,
       SUM_TIMER_READ, SUM_TIMER_WRITE,
       SUM_TIMER_READ_WITH_SHARED_LOCKS,
       SUM_TIMER_READ_HIGH_PRIORITY,
       SUM_TIMER_READ_NO_INSERT,
       SUM_TIMER_READ_NORMAL,
       SUM_TIMER_READ_EXTERNAL,
       SUM_TIMER_WRITE_ALLOW_WRITE,
       SUM_TIMER_WRITE_CONCURRENT_INSERT,
       SUM_TIMER_WRITE_LOW_PRIORITY,
       SUM_TIMER_WRITE_NORMAL,
       SUM_TIMER_WRITE_EXTERNAL
FROM performance_schema.table_lock_waits_summary_by_table
WHERE COUNT_STAR > 0"#;

pub const FILE_IO: &str = r#"
SELECT FILE_NAME,
       COUNT_STAR, SUM_TIMER_WAIT,
       COUNT_READ, SUM_TIMER_READ, SUM_NUMBER_OF_BYTES_READ,
       COUNT_WRITE, SUM_TIMER_WRITE, SUM_NUMBER_OF_BYTES_WRITE,
       COUNT_MISC, SUM_TIMER_MISC
FROM performance_schema.file_summary_by_instance"#;

pub const MUTEX: &str = r#"
SELECT EVENT_NAME, COUNT_STAR, SUM_TIMER_WAIT
FROM performance_schema.events_waits_summary_global_by_event_name
WHERE EVENT_NAME LIKE 'wait/synch/mutex/%' AND SUM_TIMER_WAIT > 0"#;

pub const STAGES: &str = r#"
SELECT EVENT_NAME, COUNT_STAR, SUM_TIMER_WAIT
FROM performance_schema.events_stages_summary_global_by_event_name
WHERE SUM_TIMER_WAIT > 0"#;

pub const PROCESSLIST: &str = r#"
SELECT ID, USER, HOST, DB, COMMAND, TIME, STATE, INFO
FROM information_schema.processlist"#;

/// Prefix removed from mutex event names.
pub const MUTEX_PREFIX: &str = "wait/synch/mutex/";

/// Prefix removed from stage event names.
pub const STAGE_PREFIX: &str = "stage/sql/";

/// Appends the schema filter to a per-table query.
pub fn with_database_filter(base: &str, filter: &DatabaseFilter) -> String {
    format!("{}{}", base, filter.extra_sql(SCHEMA_COLUMN))
}

/// `SELECT VARIABLE_NAME, VARIABLE_VALUE FROM <table>`.
pub fn name_value_query(table: VariablesTable) -> String {
    format!("SELECT VARIABLE_NAME, VARIABLE_VALUE FROM {}", table.qualified_name())
}
