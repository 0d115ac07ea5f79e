//! Entity name rewriting applied before display and grouping.
//!
//! Two independent transforms:
//! - [`MungeRules`]: ordered `regex = replacement` pairs from the `[munge]`
//!   section of `~/.pstoprc`, e.g. `_[0-9]{8}$ = _YYYYMMDD` folds daily
//!   partition tables into one row.
//! - [`Anonymiser`]: replaces real names with stable generated ones
//!   (`db1`, `table3`, ...) when `--anonymise` is given.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use regex::Regex;
use tracing::{debug, warn};

/// Default location of the rc file.
pub const RC_FILE: &str = ".pstoprc";

const MUNGE_SECTION: &str = "munge";

/// Error loading configuration files.
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io(String),
    /// File is not valid INI.
    Parse(String),
    /// A value is present but unusable.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => ConfigError::Io(io.to_string()),
            ini::Error::Parse(parse) => ConfigError::Parse(parse.to_string()),
        }
    }
}

/// Returns `$HOME/<name>`, if `$HOME` is set.
pub fn home_file(name: &str) -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(name))
}

/// Backslashes are regex syntax, not INI escapes.
pub(crate) fn regex_friendly() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    }
}

#[derive(Debug)]
struct MungeRule {
    pattern: Regex,
    replacement: String,
}

/// Ordered list of regex rewrite rules.
#[derive(Debug, Default)]
pub struct MungeRules {
    rules: Vec<MungeRule>,
}

impl MungeRules {
    /// Rules that leave every name untouched.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds rules from `(pattern, replacement)` pairs, skipping patterns
    /// that do not compile.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut rules = Vec::new();
        for (pattern, replacement) in pairs {
            match Regex::new(pattern) {
                Ok(re) => rules.push(MungeRule {
                    pattern: re,
                    replacement: replacement.to_string(),
                }),
                Err(e) => warn!("ignoring munge pattern {:?}: {}", pattern, e),
            }
        }
        Self { rules }
    }

    /// Reads the `[munge]` section of an rc file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file_opt(path, regex_friendly())?;
        let rules = match ini.section(Some(MUNGE_SECTION)) {
            Some(section) => Self::from_pairs(section.iter()),
            None => Self::identity(),
        };
        debug!("loaded {} munge rule(s) from {}", rules.len(), path.display());
        Ok(rules)
    }

    /// Loads `~/.pstoprc`. Any failure is logged and yields identity rules.
    pub fn load_default() -> Self {
        let Some(path) = home_file(RC_FILE) else {
            return Self::identity();
        };
        if !path.exists() {
            debug!("{} not found, nothing to munge", path.display());
            return Self::identity();
        }
        match Self::from_file(&path) {
            Ok(rules) => rules,
            Err(e) => {
                warn!("could not load {}: {}", path.display(), e);
                Self::identity()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule in order, each to the output of the previous one.
    pub fn munge(&self, name: &str) -> String {
        let mut munged = name.to_string();
        for rule in &self.rules {
            if rule.pattern.is_match(&munged) {
                munged = rule
                    .pattern
                    .replace_all(&munged, regex::NoExpand(&rule.replacement))
                    .into_owned();
            }
        }
        munged
    }
}

/// Kind of name being anonymised; selects the generated prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Schema,
    Table,
    File,
    User,
    Host,
}

impl NameKind {
    fn prefix(self) -> &'static str {
        match self {
            NameKind::Schema => "db",
            NameKind::Table => "table",
            NameKind::File => "file",
            NameKind::User => "user",
            NameKind::Host => "host",
        }
    }
}

/// Replaces names with generated ones, stable for the life of the process.
#[derive(Debug, Default)]
pub struct Anonymiser {
    enabled: bool,
    seen: RefCell<HashMap<(NameKind, String), String>>,
}

impl Anonymiser {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn anonymise(&self, kind: NameKind, name: &str) -> String {
        if !self.enabled || name.is_empty() {
            return name.to_string();
        }
        let mut seen = self.seen.borrow_mut();
        let next = seen.keys().filter(|(k, _)| *k == kind).count() + 1;
        seen.entry((kind, name.to_string()))
            .or_insert_with(|| format!("{}{}", kind.prefix(), next))
            .clone()
    }
}

/// Combined name rewriting handed to the data source adapters.
#[derive(Debug, Default)]
pub struct NameRewriter {
    pub rules: MungeRules,
    pub anonymiser: Anonymiser,
}

impl NameRewriter {
    pub fn new(rules: MungeRules, anonymiser: Anonymiser) -> Self {
        Self { rules, anonymiser }
    }

    /// `schema.table`, anonymised part by part, then munged.
    pub fn table_name(&self, schema: &str, table: &str) -> String {
        let schema = self.anonymiser.anonymise(NameKind::Schema, schema);
        let table = self.anonymiser.anonymise(NameKind::Table, table);
        self.rules
            .munge(&crate::fmt::qualified_table_name(&schema, &table))
    }

    pub fn name(&self, kind: NameKind, name: &str) -> String {
        self.rules.munge(&self.anonymiser.anonymise(kind, name))
    }
}
