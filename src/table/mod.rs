//! table
//!
//! Projection of heterogeneous key-value records into a rectangular
//! table.
//!
//! # Design
//!
//! KV-backed lookups return JSON records whose shapes drift: fields go
//! missing, values nest. Flat-file consumers need a rectangle. This
//! module builds one:
//!
//! 1. [`FieldList::from_schema_content`] derives the declared columns
//!    from collection schema metadata (`field.`-prefixed keys), always
//!    prepending the reserved `_key` identity column
//! 2. [`flatten_record`] reduces one record to flat dotted keys,
//!    restricted to the declared columns
//! 3. [`project`] emits one row per record with exactly one cell per
//!    column, padding absent fields with the empty string
//!
//! The padding invariant is what lets consumers zip header and row
//! positionally without bounds checks.
//!
//! # Example
//!
//! ```
//! use tabularium::table::{project, FieldList};
//! use serde_json::json;
//!
//! let fields = FieldList::new(vec!["host".into(), "ip".into()]);
//! let records = vec![
//!     json!({"_key": "a1", "host": "web-1", "ip": "10.0.0.1"})
//!         .as_object().unwrap().clone(),
//!     json!({"_key": "a2", "host": "web-2"}).as_object().unwrap().clone(),
//! ];
//!
//! let table = project(&fields, &records);
//! assert_eq!(table.header(), &["_key", "host", "ip"]);
//! assert_eq!(table.rows()[1], vec!["a2", "web-2", ""]);
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

/// The reserved identity column, always first.
pub const KEY_FIELD: &str = "_key";

/// Prefix marking a schema key as a user-visible field.
pub const FIELD_PREFIX: &str = "field.";

/// Separator used when joining nested keys into flat dotted paths.
const KEY_SEPARATOR: char = '.';

/// One raw record from the KV collection: a key-value mapping whose
/// values may themselves be mappings. Insertion order is preserved.
pub type Record = serde_json::Map<String, Value>;

/// Ordered column names for a lookup table.
///
/// The reserved `_key` identity column is always the first entry,
/// prepended unconditionally at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList(Vec<String>);

impl FieldList {
    /// Build a field list from declared field names.
    ///
    /// `_key` is prepended first; it does not need to appear in `fields`
    /// and is not duplicated if a caller passes it anyway.
    pub fn new(fields: Vec<String>) -> Self {
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(KEY_FIELD.to_string());
        for field in fields {
            if field != KEY_FIELD {
                all.push(field);
            }
        }
        Self(all)
    }

    /// Derive the field list from collection schema metadata.
    ///
    /// Keys carrying the `field.` prefix are user-visible columns; the
    /// prefix is stripped and schema order is preserved. Keys without
    /// the prefix are configuration entries, not columns, and are
    /// ignored. `_key` is prepended even when no key matches.
    pub fn from_schema_content(content: &serde_json::Map<String, Value>) -> Self {
        let fields = content
            .keys()
            .filter_map(|key| key.strip_prefix(FIELD_PREFIX))
            .map(str::to_string)
            .collect();
        Self::new(fields)
    }

    /// Number of columns, including `_key`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A field list is never empty; `_key` is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The column names in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the column names in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Whether `name` is a declared column.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    /// Whether any declared column sits underneath the given dotted
    /// prefix. Used to decide whether descending into a nested mapping
    /// can surface anything the schema declares.
    fn contains_under(&self, prefix: &str) -> bool {
        self.0.iter().any(|f| {
            f.len() > prefix.len() + 1
                && f.starts_with(prefix)
                && f.as_bytes()[prefix.len()] == b'.'
        })
    }
}

/// A rectangular lookup table: a header row followed by data rows.
///
/// # Invariant
///
/// Every data row has exactly `header().len()` cells, aligned
/// positionally to the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    fields: FieldList,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// The header row (column names in order).
    pub fn header(&self) -> &[String] {
        self.fields.as_slice()
    }

    /// The data rows, each exactly `header().len()` cells wide.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Consume the table into the flat row-0-is-header form that
    /// flat-file lookup consumers expect.
    pub fn into_rows(self) -> Vec<Vec<String>> {
        let mut all = Vec::with_capacity(self.rows.len() + 1);
        all.push(self.fields.0);
        all.extend(self.rows);
        all
    }
}

/// Render a leaf JSON value as a table cell.
///
/// Strings render bare, scalars via their JSON form, null as empty.
/// Arrays keep their compact JSON form since a flat cell has no better
/// representation for them.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten one record to flat dotted keys, restricted to declared fields.
///
/// Nested mappings contribute `parent.child` keys. The walk descends
/// into a nested mapping only when some declared field sits underneath
/// it; undeclared keys are dropped without being visited.
pub fn flatten_record(record: &Record, fields: &FieldList) -> HashMap<String, String> {
    let mut flat = HashMap::new();
    flatten_into(record, None, fields, &mut flat);
    flat
}

fn flatten_into(
    mapping: &serde_json::Map<String, Value>,
    prefix: Option<&str>,
    fields: &FieldList,
    flat: &mut HashMap<String, String>,
) {
    for (key, value) in mapping {
        let path = match prefix {
            Some(p) => format!("{p}{KEY_SEPARATOR}{key}"),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => {
                if fields.contains_under(&path) {
                    flatten_into(nested, Some(&path), fields, flat);
                } else {
                    debug!(key = %path, "dropping nested mapping with no declared fields");
                }
            }
            leaf => {
                if fields.contains(&path) {
                    flat.insert(path, render_cell(leaf));
                } else {
                    debug!(key = %path, "dropping field not present in schema");
                }
            }
        }
    }
}

/// Project records into a rectangular table.
///
/// Every emitted row has exactly `fields.len()` cells; a record's
/// missing fields become empty strings so header and rows always zip
/// positionally.
pub fn project(fields: &FieldList, records: &[Record]) -> Table {
    let rows = records
        .iter()
        .map(|record| {
            let flat = flatten_record(record, fields);
            fields
                .iter()
                .map(|field| flat.get(field).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Table {
        fields: fields.clone(),
        rows,
    }
}

/// Whether every cell in the row is blank after trimming whitespace.
///
/// Used by callers to prune vestigial rows. Borrows the row and never
/// mutates it; absent fields were already padded to `""` by
/// [`project`], so padding cells count as blank.
pub fn is_empty_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}
