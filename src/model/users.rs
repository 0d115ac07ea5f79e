//! Per-user activity aggregated from `information_schema.processlist`.
//!
//! Processlist values are point-in-time, not monotonic counters, so this
//! domain never shows relative statistics. Times are stored in picoseconds
//! like every other domain so the same formatting applies.

use super::metric_row;

metric_row! {
    /// One user's connections, grouped from processlist entries.
    pub struct UserRow {
        wait: runtime;
        /// Time spent by non-sleeping connections.
        runtime,
        /// Time spent by sleeping connections.
        sleeptime,
        connections,
        active,
        hosts,
        dbs,
        selects,
        inserts,
        updates,
        deletes,
        other,
    }
}
