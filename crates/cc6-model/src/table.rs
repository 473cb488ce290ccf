//! CMOR table model.
//!
//! Variable tables (`1hr`, `6hr`, `day`, `mon`, `fx`) describe the requested
//! variables; the coordinate, grids and formula_terms tables only contribute
//! the `out_name`s of variables a file may carry next to the data variable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;

/// `Header` block of a variable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHeader {
    /// E.g. `"Table mon"`.
    pub table_id: String,
    #[serde(default)]
    pub missing_value: Option<AttributeValue>,
    #[serde(default)]
    pub int_missing_value: Option<AttributeValue>,
    #[serde(default)]
    pub cmor_version: Option<String>,
    #[serde(default)]
    pub table_date: Option<String>,
}

impl TableHeader {
    /// Table name without the `Table ` prefix.
    pub fn short_id(&self) -> &str {
        short_table_id(&self.table_id)
    }

    pub fn missing_value_f64(&self) -> Option<f64> {
        self.missing_value.as_ref().and_then(AttributeValue::as_f64)
    }
}

/// Strip the optional `Table ` prefix from a table identifier.
pub fn short_table_id(table_id: &str) -> &str {
    let trimmed = table_id.trim();
    trimmed.strip_prefix("Table ").unwrap_or(trimmed).trim()
}

/// One requested variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub cell_methods: Option<String>,
    #[serde(default)]
    pub standard_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub out_name: Option<String>,
}

/// A per-frequency variable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableTable {
    #[serde(rename = "Header")]
    pub header: TableHeader,
    pub variable_entry: BTreeMap<String, VariableEntry>,
}

impl VariableTable {
    pub fn entry(&self, variable: &str) -> Option<&VariableEntry> {
        self.variable_entry.get(variable)
    }
}

/// Any entry that only matters for its `out_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutNameEntry {
    #[serde(default)]
    pub out_name: String,
}

/// Coordinate, grids or formula_terms table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTable {
    #[serde(default)]
    pub axis_entry: BTreeMap<String, OutNameEntry>,
    #[serde(default)]
    pub variable_entry: BTreeMap<String, OutNameEntry>,
    #[serde(default)]
    pub formula_entry: BTreeMap<String, OutNameEntry>,
}

impl CoordinateTable {
    /// Non-empty `out_name`s of all entries.
    pub fn out_names(&self) -> impl Iterator<Item = &str> {
        self.axis_entry
            .values()
            .chain(self.variable_entry.values())
            .chain(self.formula_entry.values())
            .map(|entry| entry.out_name.as_str())
            .filter(|name| !name.is_empty())
    }
}
