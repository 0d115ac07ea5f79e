//! Collapses raw `FILE_NAME` paths into short, mergeable labels.
//!
//! Redo logs, binlogs and the like become a single `<kind>` entry, table
//! files become `schema.table`, and the data directory prefix is dropped
//! from everything else.

use std::collections::HashMap;

use regex::Regex;

use crate::fmt::qualified_table_name;

struct Pattern {
    regex: Regex,
    label: &'static str,
}

/// Maps file paths reported by `file_summary_by_instance` to display names.
pub struct FileNameSimplifier {
    datadir: String,
    relay_log: Option<Regex>,
    patterns: Vec<Pattern>,
    table_file: Regex,
    partition: Regex,
    cache: HashMap<String, String>,
}

const PATTERNS: &[(&str, &str)] = &[
    (r"/ib_logfile\d+$", "<redo_log>"),
    (r"/#innodb_redo/#ib_redo\d+(_tmp)?$", "<redo_log>"),
    (r"/ibdata\d+$", "<ibdata>"),
    (r"/ibtmp\d+$", "<ibtmp>"),
    (r"/undo_?\d+(\.ibu)?$", "<undo_log>"),
    (r"/mysql\.ibd$", "<mysql_ibd>"),
    (r"/(binlog|mysql-bin|[^/]+-bin)\.\d+$", "<binlog>"),
    (r"/(binlog|mysql-bin|[^/]+-bin)\.index$", "<binlog_index>"),
    (r"/(relay-log|mysql-relay-bin|[^/]+-relay-bin)\.(\d+|index)$", "<relay_log>"),
    (r"/#sql[^/]*$", "<temp_table>"),
    (r"^/tmp/", "<temp_file>"),
    (r"/auto\.cnf$", "<auto_cnf>"),
    (r"/[^/]+\.pid$", "<pid_file>"),
    (r"/[^/]+-slow\.log$", "<slow_log>"),
    (r"/[^/]+\.err$", "<error_log>"),
];

impl FileNameSimplifier {
    /// `datadir` and `relay_log` are the server variables of the same name.
    pub fn new(datadir: &str, relay_log: &str) -> Self {
        let patterns = PATTERNS
            .iter()
            .filter_map(|(re, label)| Regex::new(re).ok().map(|regex| Pattern { regex, label }))
            .collect();
        let relay_log = if relay_log.is_empty() {
            None
        } else {
            let base = relay_log.rsplit('/').next().unwrap_or(relay_log);
            Regex::new(&format!(r"/{}\.(\d+|index)$", regex::escape(base))).ok()
        };
        Self {
            datadir: datadir.trim_end_matches('/').to_string(),
            relay_log,
            patterns,
            table_file: Regex::new(r"([^/]+)/([^/]+)\.(ibd|frm|MYD|MYI|CSM|CSV|par|sdi)$")
                .expect("Invalid regex"),
            partition: Regex::new(r"#(?i:p)#.*$").expect("Invalid regex"),
            cache: HashMap::new(),
        }
    }

    /// Simplified name for `path`.
    pub fn simplify(&mut self, path: &str) -> String {
        if let Some(hit) = self.cache.get(path) {
            return hit.clone();
        }
        let simplified = self.compute(path);
        self.cache.insert(path.to_string(), simplified.clone());
        simplified
    }

    fn compute(&self, path: &str) -> String {
        if self.relay_log.as_ref().is_some_and(|relay| relay.is_match(path)) {
            return "<relay_log>".to_string();
        }
        if let Some(p) = self.patterns.iter().find(|p| p.regex.is_match(path)) {
            return p.label.to_string();
        }
        if let Some(caps) = self.table_file.captures(path) {
            let table = self.partition.replace(&caps[2], "");
            return qualified_table_name(&decode_identifier(&caps[1]), &decode_identifier(&table));
        }
        self.strip_datadir(path).to_string()
    }

    fn strip_datadir<'a>(&self, path: &'a str) -> &'a str {
        if self.datadir.is_empty() {
            return path;
        }
        path.strip_prefix(&self.datadir)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }
}

/// Decodes the `@XXXX` escapes MySQL uses for special characters in file names.
fn decode_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find('@') {
        out.push_str(&rest[..pos]);
        let hex = rest.get(pos + 1..pos + 5);
        match hex
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .and_then(char::from_u32)
        {
            Some(c) => {
                out.push(c);
                rest = &rest[pos + 5..];
            }
            None => {
                out.push('@');
                rest = &rest[pos + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplifier() -> FileNameSimplifier {
        FileNameSimplifier::new("/var/lib/mysql/", "")
    }

    #[test]
    fn table_files_become_qualified_names() {
        let mut s = simplifier();
        assert_eq!(s.simplify("/var/lib/mysql/shop/orders.ibd"), "shop.orders");
        assert_eq!(s.simplify("/var/lib/mysql/shop/orders.frm"), "shop.orders");
        assert_eq!(s.simplify("/var/lib/mysql/shop/big#P#p2017.ibd"), "shop.big");
    }

    #[test]
    fn log_files_collapse_to_labels() {
        let mut s = simplifier();
        assert_eq!(s.simplify("/var/lib/mysql/ib_logfile0"), "<redo_log>");
        assert_eq!(s.simplify("/var/lib/mysql/ib_logfile1"), "<redo_log>");
        assert_eq!(s.simplify("/var/lib/mysql/ibdata1"), "<ibdata>");
        assert_eq!(s.simplify("/var/lib/mysql/binlog.000042"), "<binlog>");
        assert_eq!(s.simplify("/var/lib/mysql/shop/#sql-1a2b_3.ibd"), "<temp_table>");
    }

    #[test]
    fn configured_relay_log_is_recognised() {
        let mut s = FileNameSimplifier::new("/data", "/data/replica-relay.log");
        assert_eq!(s.simplify("/data/replica-relay.log.000003"), "<relay_log>");
    }

    #[test]
    fn datadir_prefix_is_stripped() {
        let mut s = simplifier();
        assert_eq!(s.simplify("/var/lib/mysql/something.dat"), "something.dat");
        assert_eq!(s.simplify("/elsewhere/file.dat"), "/elsewhere/file.dat");
    }

    #[test]
    fn escaped_identifiers_are_decoded() {
        assert_eq!(decode_identifier("my@002dtable"), "my-table");
        assert_eq!(decode_identifier("plain"), "plain");
        assert_eq!(decode_identifier("odd@zz"), "odd@zz");
    }
}
