//! Global variables and status, with the I_S -> P_S compatibility fallback.
//!
//! Older servers expose `GLOBAL_VARIABLES`/`GLOBAL_STATUS` in
//! INFORMATION_SCHEMA; 5.7 with `show_compatibility_56=OFF` and 8.0 only in
//! performance_schema. The first query tries I_S; on one of the known
//! incompatibility errors it retries once against P_S, and after that
//! succeeds every later query goes straight to P_S.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use mysql::Row;
use tracing::{debug, warn};

use super::mysql_client::{SharedClient, text};
use super::queries::name_value_query;
use super::traits::CollectError;

/// Process-wide record of whether the P_S fallback is in use.
static COMPATIBILITY: CompatibilityFlag = CompatibilityFlag::new();

/// Sticky flag: once set it stays set for the life of the process.
#[derive(Debug, Default)]
pub struct CompatibilityFlag(AtomicBool);

impl CompatibilityFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// The flag shared by every adapter in the process.
    pub fn global() -> &'static CompatibilityFlag {
        &COMPATIBILITY
    }

    pub fn use_performance_schema(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Only assignment point for the flag.
    fn remember_fallback(&self) {
        if !self.0.swap(true, Ordering::Relaxed) {
            warn!(
                "INFORMATION_SCHEMA global tables unavailable, using performance_schema from now on"
            );
        }
    }
}

/// Table holding name/value pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariablesTable {
    InformationSchemaVariables,
    PerformanceSchemaVariables,
    InformationSchemaStatus,
    PerformanceSchemaStatus,
}

impl VariablesTable {
    pub fn qualified_name(self) -> &'static str {
        match self {
            VariablesTable::InformationSchemaVariables => "INFORMATION_SCHEMA.GLOBAL_VARIABLES",
            VariablesTable::PerformanceSchemaVariables => "performance_schema.global_variables",
            VariablesTable::InformationSchemaStatus => "INFORMATION_SCHEMA.GLOBAL_STATUS",
            VariablesTable::PerformanceSchemaStatus => "performance_schema.global_status",
        }
    }

    fn variables(performance_schema: bool) -> Self {
        if performance_schema {
            VariablesTable::PerformanceSchemaVariables
        } else {
            VariablesTable::InformationSchemaVariables
        }
    }

    fn status(performance_schema: bool) -> Self {
        if performance_schema {
            VariablesTable::PerformanceSchemaStatus
        } else {
            VariablesTable::InformationSchemaStatus
        }
    }
}

/// Runs `run` with the query for the currently selected table, retrying once
/// against performance_schema on a compatibility error.
fn select_with_fallback<T>(
    flag: &CompatibilityFlag,
    table: fn(bool) -> VariablesTable,
    mut run: impl FnMut(&str) -> Result<T, CollectError>,
) -> Result<T, CollectError> {
    let use_ps = flag.use_performance_schema();
    match run(&name_value_query(table(use_ps))) {
        Ok(value) => Ok(value),
        Err(e) if !use_ps && e.is_fallback_candidate() => {
            debug!("{}; retrying against performance_schema", e);
            let value = run(&name_value_query(table(true)))?;
            flag.remember_fallback();
            Ok(value)
        }
        Err(e) => Err(e),
    }
}

/// Name/value rows with lower-cased names.
fn name_values(rows: Vec<Row>) -> Result<HashMap<String, String>, CollectError> {
    let mut values = HashMap::with_capacity(rows.len());
    for row in &rows {
        values.insert(text(row, 0)?.to_lowercase(), text(row, 1)?);
    }
    Ok(values)
}

fn load(
    client: &SharedClient,
    flag: &CompatibilityFlag,
    table: fn(bool) -> VariablesTable,
) -> Result<HashMap<String, String>, CollectError> {
    let rows = select_with_fallback(flag, table, |sql| {
        client.borrow_mut().query_rows(sql, &[])
    })?;
    name_values(rows)
}

/// Snapshot of `GLOBAL_VARIABLES`.
#[derive(Debug, Clone, Default)]
pub struct GlobalVariables {
    values: HashMap<String, String>,
}

impl GlobalVariables {
    pub fn load(client: &SharedClient, flag: &CompatibilityFlag) -> Result<Self, CollectError> {
        let values = load(client, flag, VariablesTable::variables)?;
        debug!("loaded {} global variable(s)", values.len());
        Ok(Self { values })
    }

    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Value of `key` (case-insensitive), empty if unknown.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(&key.to_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Snapshot of `GLOBAL_STATUS`.
#[derive(Debug, Clone, Default)]
pub struct GlobalStatus {
    values: HashMap<String, String>,
}

impl GlobalStatus {
    pub fn load(client: &SharedClient, flag: &CompatibilityFlag) -> Result<Self, CollectError> {
        Ok(Self {
            values: load(client, flag, VariablesTable::status)?,
        })
    }

    /// Numeric status value; 0 if unknown or not a number.
    pub fn get_u64(&self, key: &str) -> u64 {
        self.values
            .get(&key.to_lowercase())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Server facts shown in the heading line.
pub trait ServerInfo {
    /// Short host name of the server.
    fn hostname(&self) -> &str;
    fn mysql_version(&self) -> &str;
    /// Seconds since server start, as of the last refresh.
    fn uptime(&self) -> u64;
    /// Re-reads the values that change over time.
    fn refresh(&mut self) -> Result<(), CollectError>;
}

/// [`ServerInfo`] backed by the live connection.
pub struct ServerContext {
    client: SharedClient,
    hostname: String,
    version: String,
    uptime: u64,
}

impl ServerContext {
    pub fn new(client: SharedClient, variables: &GlobalVariables) -> Self {
        Self {
            client,
            hostname: short_hostname(variables.get("hostname")).to_string(),
            version: variables.get("version").to_string(),
            uptime: 0,
        }
    }

    /// Replaces the host name, e.g. with an anonymised one.
    pub fn with_hostname(mut self, hostname: String) -> Self {
        self.hostname = hostname;
        self
    }
}

impl ServerInfo for ServerContext {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn mysql_version(&self) -> &str {
        &self.version
    }

    fn uptime(&self) -> u64 {
        self.uptime
    }

    fn refresh(&mut self) -> Result<(), CollectError> {
        let status = GlobalStatus::load(&self.client, CompatibilityFlag::global())?;
        self.uptime = status.get_u64("Uptime");
        Ok(())
    }
}

/// Host name up to the first dot.
pub fn short_hostname(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incompatible() -> CollectError {
        CollectError::from_server(3167, "feature disabled".into())
    }

    #[test]
    fn first_query_uses_information_schema() {
        let flag = CompatibilityFlag::new();
        let mut seen = Vec::new();
        let result = select_with_fallback(&flag, VariablesTable::variables, |sql| {
            seen.push(sql.to_string());
            Ok(1)
        });
        assert_eq!(result, Ok(1));
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("INFORMATION_SCHEMA.GLOBAL_VARIABLES"));
        assert!(!flag.use_performance_schema());
    }

    #[test]
    fn compatibility_error_retries_once_and_sticks() {
        let flag = CompatibilityFlag::new();
        let mut seen = Vec::new();
        let result = select_with_fallback(&flag, VariablesTable::variables, |sql| {
            seen.push(sql.to_string());
            if sql.contains("INFORMATION_SCHEMA") {
                Err(incompatible())
            } else {
                Ok(2)
            }
        });
        assert_eq!(result, Ok(2));
        assert_eq!(seen.len(), 2);
        assert!(seen[1].contains("performance_schema.global_variables"));
        assert!(flag.use_performance_schema());

        // Status queries now skip I_S as well.
        let mut later = Vec::new();
        let _ = select_with_fallback(&flag, VariablesTable::status, |sql| {
            later.push(sql.to_string());
            Ok(3)
        });
        assert_eq!(later.len(), 1);
        assert!(later[0].contains("performance_schema.global_status"));
    }

    #[test]
    fn failed_fallback_is_fatal_and_not_remembered() {
        let flag = CompatibilityFlag::new();
        let mut calls = 0;
        let result: Result<(), _> = select_with_fallback(&flag, VariablesTable::status, |_| {
            calls += 1;
            Err(incompatible())
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
        assert!(!flag.use_performance_schema());
    }

    #[test]
    fn other_errors_are_not_retried() {
        let flag = CompatibilityFlag::new();
        let mut calls = 0;
        let result: Result<(), _> = select_with_fallback(&flag, VariablesTable::variables, |_| {
            calls += 1;
            Err(CollectError::Connection("gone away".into()))
        });
        assert_eq!(result, Err(CollectError::Connection("gone away".into())));
        assert_eq!(calls, 1);
    }

    #[test]
    fn variables_lookup_is_case_insensitive() {
        let mut map = HashMap::new();
        map.insert("hostname".to_string(), "db1.example.com".to_string());
        let vars = GlobalVariables::from_map(map);
        assert_eq!(vars.get("HOSTNAME"), "db1.example.com");
        assert_eq!(vars.get("missing"), "");
    }

    #[test]
    fn short_hostname_truncates_at_dot() {
        assert_eq!(short_hostname("db1.example.com"), "db1");
        assert_eq!(short_hostname("db1"), "db1");
        assert_eq!(short_hostname(""), "");
    }
}
