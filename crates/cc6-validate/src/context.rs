//! Per-file facts resolved once before the checks run.

use cc6_model::frequency::UNKNOWN_FREQUENCY;
use cc6_model::table::short_table_id;
use cc6_standards::TableSet;

use crate::dataset::Dataset;

/// Requested variables, table and sampling of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    /// File variables requested by any variable table, in file order.
    pub varnames: Vec<String>,
    /// Short table id (`mon`), or `unknown`.
    pub table_id: String,
    pub frequency: String,
    pub cell_methods: String,
}

impl FileContext {
    pub fn resolve(tables: &TableSet, ds: &dyn Dataset) -> Self {
        let requested = tables.variable_names();
        let varnames: Vec<String> = ds
            .variable_names()
            .into_iter()
            .filter(|name| requested.contains(name))
            .map(str::to_string)
            .collect();

        // Some files only carry the frequency, which doubles as the table name.
        let table_id = ds
            .global_attribute_str("table_id")
            .or_else(|| ds.global_attribute_str("frequency"))
            .map_or(UNKNOWN_FREQUENCY, short_table_id)
            .to_string();

        let entry = varnames
            .first()
            .and_then(|name| tables.variable_entry(&table_id, name));
        let frequency = entry
            .and_then(|entry| entry.frequency.as_deref())
            .unwrap_or(UNKNOWN_FREQUENCY)
            .to_string();
        let cell_methods = entry
            .and_then(|entry| entry.cell_methods.as_deref())
            .unwrap_or(UNKNOWN_FREQUENCY)
            .to_string();

        if frequency == UNKNOWN_FREQUENCY {
            tracing::warn!(
                file = ds.file_name(),
                table_id = %table_id,
                "could not determine the requested frequency"
            );
        }

        Self {
            varnames,
            table_id,
            frequency,
            cell_methods,
        }
    }

    /// The variable the checks focus on; later ones are ignored.
    pub fn main_variable(&self) -> Option<&str> {
        self.varnames.first().map(String::as_str)
    }
}
