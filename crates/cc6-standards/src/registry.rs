#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use cc6_model::{
    ConfigurationError, ControlledVocabulary, CoordinateTable, VariableEntry, VariableTable,
};

use crate::classify::{CV_ROOT_KEY, classify_cv};
use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::paths::{table_file_name, table_path};

/// Table holding the controlled vocabulary.
pub const CV_TABLE: &str = "CV";

/// Per-frequency variable tables, in lookup order.
pub const VARIABLE_TABLES: &[&str] = &["1hr", "6hr", "day", "mon", "fx"];

pub const COORDINATE_TABLE: &str = "coordinate";
pub const GRIDS_TABLE: &str = "grids";
pub const FORMULA_TERMS_TABLE: &str = "formula_terms";

/// SHA-256 of one loaded table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFingerprint {
    pub table: String,
    pub file_name: String,
    pub sha256: String,
}

/// All tables needed by the checker. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct TableSet {
    pub cv: ControlledVocabulary,
    pub variable_tables: BTreeMap<String, VariableTable>,
    pub coordinate: CoordinateTable,
    pub grids: CoordinateTable,
    pub formula_terms: CoordinateTable,
    pub fingerprints: Vec<TableFingerprint>,
}

impl TableSet {
    /// Load and classify every table below `root`.
    pub fn load(root: &Path) -> Result<Self, StandardsError> {
        let mut fingerprints = Vec::new();

        let cv_value = read_table(root, CV_TABLE, &mut fingerprints)?;
        let cv = parse_cv(&cv_value)
            .map_err(|e| StandardsError::configuration(table_path(root, CV_TABLE), e))?;

        let mut variable_tables = BTreeMap::new();
        for table in VARIABLE_TABLES {
            let value = read_table(root, table, &mut fingerprints)?;
            let parsed = parse_variable_table(table, value)
                .map_err(|e| StandardsError::configuration(table_path(root, table), e))?;
            variable_tables.insert((*table).to_string(), parsed);
        }

        let mut auxiliary = Vec::with_capacity(3);
        for table in [COORDINATE_TABLE, GRIDS_TABLE, FORMULA_TERMS_TABLE] {
            let value = read_table(root, table, &mut fingerprints)?;
            let parsed = parse_auxiliary_table(table, value)
                .map_err(|e| StandardsError::configuration(table_path(root, table), e))?;
            auxiliary.push(parsed);
        }
        let mut auxiliary = auxiliary.into_iter();
        let coordinate = auxiliary.next().unwrap_or_default();
        let grids = auxiliary.next().unwrap_or_default();
        let formula_terms = auxiliary.next().unwrap_or_default();

        tracing::info!(
            root = %root.display(),
            cv_entries = cv.len(),
            variable_tables = variable_tables.len(),
            "loaded CORDEX-CMIP6 tables"
        );

        Ok(Self {
            cv,
            variable_tables,
            coordinate,
            grids,
            formula_terms,
            fingerprints,
        })
    }

    /// Assemble a table set from already parsed parts.
    pub fn from_parts(
        cv: ControlledVocabulary,
        variable_tables: BTreeMap<String, VariableTable>,
        coordinate: CoordinateTable,
    ) -> Self {
        Self {
            cv,
            variable_tables,
            coordinate,
            grids: CoordinateTable::default(),
            formula_terms: CoordinateTable::default(),
            fingerprints: Vec::new(),
        }
    }

    /// Variable table by short id (`"mon"`) or full id (`"Table mon"`).
    pub fn table(&self, table_id: &str) -> Option<&VariableTable> {
        self.variable_tables
            .get(cc6_model::table::short_table_id(table_id))
    }

    /// Entry of `variable` in the given table.
    pub fn variable_entry(&self, table_id: &str, variable: &str) -> Option<&VariableEntry> {
        self.table(table_id).and_then(|table| table.entry(variable))
    }

    /// Every variable requested by any variable table.
    pub fn variable_names(&self) -> BTreeSet<&str> {
        self.variable_tables
            .values()
            .flat_map(|table| table.variable_entry.keys().map(String::as_str))
            .collect()
    }

    /// `out_name`s of coordinates, grid variables and formula terms.
    pub fn auxiliary_out_names(&self) -> BTreeSet<&str> {
        self.coordinate
            .out_names()
            .chain(self.grids.out_names())
            .chain(self.formula_terms.out_names())
            .collect()
    }
}

fn read_table(
    root: &Path,
    table: &str,
    fingerprints: &mut Vec<TableFingerprint>,
) -> Result<Value, StandardsError> {
    let path = table_path(root, table);
    let bytes = std::fs::read(&path).map_err(|e| StandardsError::io(&path, e))?;
    let value = serde_json::from_slice(&bytes).map_err(|e| StandardsError::Json {
        path: path.clone(),
        source: e,
    })?;
    let sha256 = sha256_hex(&bytes);
    tracing::debug!(table, sha256 = %sha256, "read table");
    fingerprints.push(TableFingerprint {
        table: table.to_string(),
        file_name: table_file_name(table),
        sha256,
    });
    Ok(value)
}

/// Classify the vocabulary wrapped under the `CV` key of the CV file.
pub fn parse_cv(value: &Value) -> Result<ControlledVocabulary, ConfigurationError> {
    let inner = value.get(CV_ROOT_KEY).ok_or_else(|| missing_key(CV_TABLE, CV_ROOT_KEY))?;
    classify_cv(inner)
}

/// Validate and deserialize a per-frequency variable table.
pub fn parse_variable_table(table: &str, value: Value) -> Result<VariableTable, ConfigurationError> {
    let header = value.get("Header").ok_or_else(|| missing_key(table, "Header"))?;
    if header.get("table_id").is_none() {
        return Err(missing_key(table, "Header.table_id"));
    }
    if value.get("variable_entry").is_none() {
        return Err(missing_key(table, "variable_entry"));
    }

    let parsed: VariableTable = deserialize_table(table, value)?;
    let expected = format!("Table {table}");
    if parsed.header.table_id.trim() != expected {
        return Err(ConfigurationError::TableNaming {
            table: table.to_string(),
            expected,
            found: parsed.header.table_id.clone(),
        });
    }
    Ok(parsed)
}

/// Deserialize a coordinate, grids or formula_terms table.
pub fn parse_auxiliary_table(table: &str, value: Value) -> Result<CoordinateTable, ConfigurationError> {
    if !value.is_object() {
        return Err(ConfigurationError::MalformedTable {
            table: table.to_string(),
            message: "expected a JSON object".to_string(),
        });
    }
    deserialize_table(table, value)
}

fn deserialize_table<T: DeserializeOwned>(table: &str, value: Value) -> Result<T, ConfigurationError> {
    serde_json::from_value(value).map_err(|e| ConfigurationError::MalformedTable {
        table: table.to_string(),
        message: e.to_string(),
    })
}

fn missing_key(table: &str, key: &str) -> ConfigurationError {
    ConfigurationError::MissingTableKey {
        table: table.to_string(),
        key: key.to_string(),
    }
}
