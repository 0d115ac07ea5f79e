//! Data collection from MySQL performance_schema.
//!
//! Each metric domain has an adapter implementing [`DataSource`], which owns
//! its query text and column mapping and returns raw rows. Adapters share one
//! [`MySqlClient`] connection; the control loop guarantees they never run
//! concurrently.

mod file_names;
#[cfg(test)]
pub mod mock;
mod mysql_client;
pub mod queries;
mod sources;
mod traits;
mod variables;

pub use file_names::FileNameSimplifier;
pub use mysql_client::{MySqlClient, SharedClient};
pub use sources::{
    FileIoSource, MutexSource, StagesSource, TableIoSource, TableLockSource, UserSource,
};
pub use traits::{CollectError, DataSource};
pub use variables::{
    CompatibilityFlag, GlobalStatus, GlobalVariables, ServerContext, ServerInfo, VariablesTable,
};

/// Optional comma-separated list of schemas that table domains are restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseFilter {
    databases: Vec<String>,
}

impl DatabaseFilter {
    /// Parses `"db1, db2,db3"`; empty entries are ignored.
    pub fn new(list: &str) -> Self {
        let databases = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { databases }
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Query parameters, one per database.
    pub fn args(&self) -> &[String] {
        &self.databases
    }

    /// SQL fragment appended to a query already holding a `WHERE` clause.
    pub fn extra_sql(&self, column: &str) -> String {
        if self.databases.is_empty() {
            return String::new();
        }
        let placeholders = vec!["?"; self.databases.len()].join(",");
        format!(" AND {} IN ({})", column, placeholders)
    }
}

impl std::fmt::Display for DatabaseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.databases.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_comma_list() {
        let filter = DatabaseFilter::new(" sales, ,hr ");
        assert_eq!(filter.args(), &["sales".to_string(), "hr".to_string()]);
        assert_eq!(filter.to_string(), "sales,hr");
    }

    #[test]
    fn filter_sql_has_one_placeholder_per_database() {
        let filter = DatabaseFilter::new("a,b,c");
        assert_eq!(filter.extra_sql("OBJECT_SCHEMA"), " AND OBJECT_SCHEMA IN (?,?,?)");
    }

    #[test]
    fn empty_filter_adds_nothing() {
        let filter = DatabaseFilter::new("");
        assert!(filter.is_empty());
        assert_eq!(filter.extra_sql("OBJECT_SCHEMA"), "");
        assert!(filter.args().is_empty());
    }
}
