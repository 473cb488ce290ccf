//! Read-only view of a NetCDF file.
//!
//! The host owns file I/O. It hands the checker either its own [`Dataset`]
//! implementation or a [`DatasetSnapshot`] filled from the file.

use serde::{Deserialize, Serialize};

use cc6_model::{AttributeMap, AttributeValue};

/// Deflate settings of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compression {
    pub complevel: u8,
    pub shuffle: bool,
}

/// A variable with its attributes and, for coordinates, its values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub shape: Vec<usize>,
    #[serde(default)]
    pub attributes: AttributeMap,
    /// Flattened values; only needed for `time` and its bounds.
    #[serde(default)]
    pub values: Option<Vec<f64>>,
    #[serde(default)]
    pub compression: Option<Compression>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Set 1-D values; the shape follows.
    #[must_use]
    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.shape = vec![values.len()];
        self.values = Some(values);
        self
    }

    /// Set values with an explicit shape.
    #[must_use]
    pub fn with_shaped_values(mut self, shape: Vec<usize>, values: Vec<f64>) -> Self {
        self.shape = shape;
        self.values = Some(values);
        self
    }

    #[must_use]
    pub fn with_compression(mut self, complevel: u8, shuffle: bool) -> Self {
        self.compression = Some(Compression { complevel, shuffle });
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Text attribute, ignoring empty values.
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes
            .get_str(name)
            .filter(|value| !value.trim().is_empty())
    }
}

/// File metadata accessors used by the checks.
pub trait Dataset {
    fn file_name(&self) -> &str;

    /// E.g. `NETCDF4_CLASSIC`.
    fn data_model(&self) -> &str;

    /// E.g. `HDF5`.
    fn disk_format(&self) -> &str;

    fn global_attributes(&self) -> &AttributeMap;

    /// Variable names in file order.
    fn variable_names(&self) -> Vec<&str>;

    fn variable(&self, name: &str) -> Option<&Variable>;

    fn global_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.global_attributes().get(name)
    }

    /// Non-empty text value of a global attribute.
    fn global_attribute_str(&self, name: &str) -> Option<&str> {
        self.global_attributes()
            .get_str(name)
            .filter(|value| !value.trim().is_empty())
    }

    /// The time coordinate: `time`, or a variable with `axis = "T"` or
    /// `standard_name = "time"`.
    fn time_variable(&self) -> Option<&Variable> {
        if let Some(time) = self.variable("time") {
            return Some(time);
        }
        self.variable_names()
            .into_iter()
            .filter_map(|name| self.variable(name))
            .find(|var| {
                var.attribute_str("axis") == Some("T")
                    || var.attribute_str("standard_name") == Some("time")
            })
    }
}

/// In-memory [`Dataset`], serializable as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSnapshot {
    pub file_name: String,
    pub data_model: String,
    pub disk_format: String,
    #[serde(default)]
    pub global_attributes: AttributeMap,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl DatasetSnapshot {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_format(mut self, data_model: impl Into<String>, disk_format: impl Into<String>) -> Self {
        self.data_model = data_model.into();
        self.disk_format = disk_format.into();
        self
    }

    #[must_use]
    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.global_attributes.insert(name, value);
        self
    }

    /// Add or replace a variable.
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        match self.variables.iter_mut().find(|var| var.name == variable.name) {
            Some(slot) => *slot = variable,
            None => self.variables.push(variable),
        }
        self
    }
}

impl Dataset for DatasetSnapshot {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn data_model(&self) -> &str {
        &self.data_model
    }

    fn disk_format(&self) -> &str {
        &self.disk_format
    }

    fn global_attributes(&self) -> &AttributeMap {
        &self.global_attributes
    }

    fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|var| var.name.as_str()).collect()
    }

    fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name == name)
    }
}
