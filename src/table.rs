//! Tabular query results and semantic column mapping.
//!
//! A [`ResultTable`] is the materialized form of one VOTable response:
//! ordered, typed columns; ordered rows of string cells; and a metadata map
//! carrying per-response diagnostics (protocol status, error text).
//!
//! On top of that, [`MappedTable`] adds name-agnostic column access through a
//! closed set of standardized mnemonics (a [`StdColumn`] implementation).
//! Services are free to name their columns anything; what identifies a
//! column semantically is its declared UCD or utype attribute. The
//! mnemonic-to-column-name map is computed once per table instance, on first
//! use, by a plain in-order scan, and cached for the instance's lifetime.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::OnceLock;

/// Metadata key under which the protocol status (`OK`, `ERROR`, `OVERFLOW`)
/// is recorded.
pub const META_QUERY_STATUS: &str = "query_status";

/// Metadata key under which protocol or per-item error text is recorded.
pub const META_ERROR_MESSAGE: &str = "error_message";

/// VOTable column datatypes, as declared by the service.
///
/// Cell values are kept as strings; the declared type travels with the
/// column metadata so callers can convert knowingly. Unknown declarations
/// fall back to [`VoDatatype::Char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoDatatype {
    Boolean,
    Bit,
    UnsignedByte,
    Short,
    Int,
    Long,
    #[default]
    Char,
    UnicodeChar,
    Float,
    Double,
    FloatComplex,
    DoubleComplex,
}

impl VoDatatype {
    /// Parses a VOTable `datatype` attribute value.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "boolean" => VoDatatype::Boolean,
            "bit" => VoDatatype::Bit,
            "unsignedbyte" => VoDatatype::UnsignedByte,
            "short" => VoDatatype::Short,
            "int" => VoDatatype::Int,
            "long" => VoDatatype::Long,
            "unicodechar" => VoDatatype::UnicodeChar,
            "float" => VoDatatype::Float,
            "double" => VoDatatype::Double,
            "floatcomplex" => VoDatatype::FloatComplex,
            "doublecomplex" => VoDatatype::DoubleComplex,
            _ => VoDatatype::Char,
        }
    }

    /// Whether values of this type are numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            VoDatatype::UnsignedByte
                | VoDatatype::Short
                | VoDatatype::Int
                | VoDatatype::Long
                | VoDatatype::Float
                | VoDatatype::Double
        )
    }
}

/// Declared metadata of one table column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    pub datatype: VoDatatype,
    pub ucd: Option<String>,
    pub utype: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl ColumnMeta {
    /// Creates a column with just a name; everything else defaults to empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: VoDatatype::default(),
            ucd: None,
            utype: None,
            unit: None,
            description: None,
        }
    }
}

/// One materialized query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<String>>,
    meta: BTreeMap<String, String>,
}

impl ResultTable {
    /// Creates a table from parsed parts.
    pub fn new(
        columns: Vec<ColumnMeta>,
        rows: Vec<Vec<String>>,
        meta: BTreeMap<String, String>,
    ) -> Self {
        Self {
            columns,
            rows,
            meta,
        }
    }

    /// Creates the empty, error-tagged placeholder recorded for a failed
    /// batch item.
    pub fn error_placeholder(message: impl Into<String>) -> Self {
        let mut meta = BTreeMap::new();
        meta.insert(META_QUERY_STATUS.to_string(), "ERROR".to_string());
        meta.insert(META_ERROR_MESSAGE.to_string(), message.into());
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            meta,
        }
    }

    /// The declared columns, in service order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Column names, in service order.
    pub fn colnames(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// One cell, addressed by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Per-response metadata (protocol status, error text, ...).
    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// The embedded protocol status, if the response carried one.
    pub fn query_status(&self) -> Option<&str> {
        self.meta.get(META_QUERY_STATUS).map(String::as_str)
    }

    /// The embedded protocol or per-item error text, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.meta.get(META_ERROR_MESSAGE).map(String::as_str)
    }

    /// Whether this result is error-tagged (service rejection or a failed
    /// batch item).
    pub fn is_error(&self) -> bool {
        self.query_status() == Some("ERROR")
    }
}

/// The metadata attribute a mnemonic matches columns by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey {
    /// Unified Content Descriptor (image service results).
    Ucd(&'static str),
    /// utype identifier (spectral service results).
    Utype(&'static str),
}

impl MatchKey {
    /// Exact, case-sensitive match against a column's declared attribute.
    pub fn matches(&self, column: &ColumnMeta) -> bool {
        match self {
            MatchKey::Ucd(key) => column.ucd.as_deref() == Some(*key),
            MatchKey::Utype(key) => column.utype.as_deref() == Some(*key),
        }
    }
}

/// A closed, statically defined set of standardized column mnemonics.
pub trait StdColumn: Copy + Eq + Sized + 'static {
    /// All mnemonics, in declaration order. Declaration order decides ties
    /// in reverse lookups.
    fn all() -> &'static [Self];

    /// Stable display name of the mnemonic.
    fn name(&self) -> &'static str;

    /// The metadata key this mnemonic matches columns by.
    fn key(&self) -> MatchKey;

    /// Whether a conformant service must provide this column.
    fn required(&self) -> bool;

    /// Human-readable description of the column concept.
    fn description(&self) -> &'static str;
}

/// Scans the columns in service order for the first one matching `key`.
fn find_column(table: &ResultTable, key: MatchKey) -> Option<String> {
    table
        .columns()
        .iter()
        .find(|column| key.matches(column))
        .map(|column| column.name.clone())
}

/// A result table with cached mnemonic-to-column-name mapping.
///
/// The map is specific to this table instance: two tables from two services
/// may map the same mnemonic to different physical column names. It is
/// computed on first use of [`column_name`](Self::column_name) or
/// [`std_column`](Self::std_column) and never recomputed; wrapping the same
/// underlying data in a new `MappedTable` is the only way to force a fresh
/// scan.
///
/// If two columns advertise the same key, the first one in service order
/// wins and the second is unreachable by mnemonic. That is a documented
/// limitation of degenerate schemas, not an error.
#[derive(Debug)]
pub struct MappedTable<S: StdColumn> {
    table: ResultTable,
    map: OnceLock<Vec<(S, Option<String>)>>,
}

impl<S: StdColumn> MappedTable<S> {
    /// Wraps a result table; no scanning happens until first mnemonic access.
    pub fn new(table: ResultTable) -> Self {
        Self {
            table,
            map: OnceLock::new(),
        }
    }

    /// Unwraps the underlying table.
    pub fn into_inner(self) -> ResultTable {
        self.table
    }

    /// The full mnemonic map, in mnemonic declaration order.
    ///
    /// Computed on first call, cached afterwards.
    pub fn column_map(&self) -> &[(S, Option<String>)] {
        self.map.get_or_init(|| {
            S::all()
                .iter()
                .map(|mnemonic| (*mnemonic, find_column(&self.table, mnemonic.key())))
                .collect()
        })
    }

    /// Resolves a mnemonic to this table's actual column name.
    ///
    /// `None` means "optional column not present" — for `required`
    /// mnemonics it indicates a non-conformant service, not a bug here.
    pub fn column_name(&self, mnemonic: S) -> Option<&str> {
        self.column_map()
            .iter()
            .find(|(m, _)| *m == mnemonic)
            .and_then(|(_, name)| name.as_deref())
    }

    /// Reverse lookup: the first mnemonic (in declaration order) that
    /// resolves to the given column name.
    pub fn std_column(&self, column_name: &str) -> Option<S> {
        self.column_map()
            .iter()
            .find(|(_, name)| name.as_deref() == Some(column_name))
            .map(|(m, _)| *m)
    }

    /// Name-agnostic column access: all values of the column a mnemonic
    /// resolves to.
    pub fn column(&self, mnemonic: S) -> Option<Vec<&str>> {
        let name = self.column_name(mnemonic)?;
        self.table.column_values(name)
    }

    /// One cell, addressed by row index and mnemonic.
    pub fn cell_by_mnemonic(&self, row: usize, mnemonic: S) -> Option<&str> {
        let name = self.column_name(mnemonic)?;
        self.table.cell(row, name)
    }
}

impl<S: StdColumn> Deref for MappedTable<S> {
    type Target = ResultTable;

    fn deref(&self) -> &ResultTable {
        &self.table
    }
}

impl<S: StdColumn> From<ResultTable> for MappedTable<S> {
    fn from(table: ResultTable) -> Self {
        Self::new(table)
    }
}
