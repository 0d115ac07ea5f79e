//! The single MySQL connection shared by every data source.

use std::cell::RefCell;
use std::rc::Rc;

use mysql::prelude::{FromValue, Queryable};
use mysql::{Conn, Opts, Params, Row, Value};
use tracing::{debug, info};

use super::traits::CollectError;

/// Connection handle shared by the adapters of every view.
///
/// All use happens on the control-loop thread, one query at a time.
pub type SharedClient = Rc<RefCell<MySqlClient>>;

/// Thin wrapper over a blocking `mysql::Conn`.
pub struct MySqlClient {
    conn: Conn,
}

impl MySqlClient {
    /// Connects using fully resolved options.
    pub fn connect(opts: Opts) -> Result<Self, CollectError> {
        let conn = Conn::new(opts).map_err(CollectError::from)?;
        info!("connected to MySQL, connection id {}", conn.connection_id());
        Ok(Self { conn })
    }

    pub fn into_shared(self) -> SharedClient {
        Rc::new(RefCell::new(self))
    }

    /// Server-side id of this session.
    pub fn connection_id(&self) -> u64 {
        u64::from(self.conn.connection_id())
    }

    /// Runs `sql`, binding `args` positionally when present.
    pub fn query_rows(&mut self, sql: &str, args: &[String]) -> Result<Vec<Row>, CollectError> {
        debug!("query: {} args: {:?}", sql, args);
        let rows = if args.is_empty() {
            self.conn.query::<Row, _>(sql)
        } else {
            let params = Params::Positional(
                args.iter()
                    .map(|a| Value::Bytes(a.as_bytes().to_vec()))
                    .collect(),
            );
            self.conn.exec::<Row, _, _>(sql, params)
        }
        .map_err(CollectError::from)?;
        debug!("query returned {} row(s)", rows.len());
        Ok(rows)
    }
}

impl From<mysql::Error> for CollectError {
    fn from(e: mysql::Error) -> Self {
        match e {
            mysql::Error::MySqlError(err) => CollectError::from_server(err.code, err.message),
            mysql::Error::FromValueError(value) => {
                CollectError::Decode(format!("unexpected value {:?}", value))
            }
            mysql::Error::FromRowError(row) => {
                CollectError::Decode(format!("unexpected row with {} column(s)", row.len()))
            }
            other => CollectError::Connection(other.to_string()),
        }
    }
}

/// Reads a nullable column, failing on a type mismatch or missing column.
pub(crate) fn column<T: FromValue>(row: &Row, idx: usize) -> Result<Option<T>, CollectError> {
    match row.get_opt::<Option<T>, usize>(idx) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(CollectError::Decode(format!("column {}: {:?}", idx, e))),
        None => Err(CollectError::Decode(format!("column {} missing", idx))),
    }
}

/// Reads an unsigned counter column as `i64`; NULL reads as 0.
pub(crate) fn counter(row: &Row, idx: usize) -> Result<i64, CollectError> {
    Ok(column::<u64>(row, idx)?
        .map(|v| i64::try_from(v).unwrap_or(i64::MAX))
        .unwrap_or(0))
}

/// Reads a text column; NULL reads as an empty string.
pub(crate) fn text(row: &Row, idx: usize) -> Result<String, CollectError> {
    Ok(column::<String>(row, idx)?.unwrap_or_default())
}
