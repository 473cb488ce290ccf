//! Classification of raw CV JSON into typed [`CvEntry`] values.
//!
//! Shapes are decided from the JSON type alone. Anything that is not one of
//! the supported shapes is a [`ConfigurationError`], raised here rather than
//! while checking a file.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use cc6_model::{ConfigurationError, ControlledVocabulary, CvEntry, CvPattern, EnumItem};

use crate::posix::convert_posix_regex;

/// Top-level key wrapping the vocabulary in `CORDEX-CMIP6_CV.json`.
pub const CV_ROOT_KEY: &str = "CV";

/// Classify the contents of a CV file (the object under the `CV` key).
pub fn classify_cv(value: &Value) -> Result<ControlledVocabulary, ConfigurationError> {
    let Value::Object(map) = value else {
        return Err(unsupported(CV_ROOT_KEY, value));
    };
    let mut entries = BTreeMap::new();
    for (attribute, raw) in map {
        entries.insert(attribute.clone(), classify_entry(attribute, raw, 1)?);
    }
    Ok(ControlledVocabulary::new(entries))
}

/// Classify one entry. `level` is 1 for attributes and 2 for dependents.
pub fn classify_entry(path: &str, value: &Value, level: u8) -> Result<CvEntry, ConfigurationError> {
    match value {
        Value::String(pattern) => Ok(CvEntry::Regex(CvPattern::new(convert_posix_regex(pattern)))),
        Value::Array(items) => items
            .iter()
            .map(|item| classify_enum_item(path, item))
            .collect::<Result<Vec<_>, _>>()
            .map(CvEntry::Enumeration),
        Value::Object(map) => classify_keyed(path, map, level),
        Value::Number(number) if level > 1 => Ok(CvEntry::Literal(number.to_string())),
        Value::Bool(flag) if level > 1 => Ok(CvEntry::Literal(flag.to_string())),
        other => Err(unsupported(path, other)),
    }
}

fn classify_enum_item(path: &str, item: &Value) -> Result<EnumItem, ConfigurationError> {
    match item {
        Value::String(literal) => Ok(EnumItem {
            literal: literal.clone(),
            pattern: CvPattern::new(convert_posix_regex(literal)),
        }),
        Value::Number(number) => Ok(EnumItem::new(number.to_string())),
        Value::Bool(flag) => Ok(EnumItem::new(flag.to_string())),
        other => Err(unsupported(path, other)),
    }
}

fn classify_keyed(
    path: &str,
    map: &Map<String, Value>,
    level: u8,
) -> Result<CvEntry, ConfigurationError> {
    if map.values().all(Value::is_string) {
        let values = map
            .iter()
            .map(|(key, value)| (key.clone(), value.as_str().unwrap_or_default().to_string()))
            .collect();
        return Ok(CvEntry::KeyedValue(values));
    }

    if !map.values().all(Value::is_object) {
        return Err(ConfigurationError::MixedKeyedPayload {
            path: path.to_string(),
        });
    }

    if level > 1 {
        return Err(ConfigurationError::NestingTooDeep {
            path: path.to_string(),
        });
    }

    let mut nested = BTreeMap::new();
    for (key, payload) in map {
        let mut dependents = BTreeMap::new();
        if let Value::Object(payload) = payload {
            for (dependent, raw) in payload {
                let dependent_path = format!("{path}.{key}.{dependent}");
                dependents.insert(
                    dependent.clone(),
                    classify_entry(&dependent_path, raw, level + 1)?,
                );
            }
        }
        nested.insert(key.clone(), dependents);
    }
    Ok(CvEntry::KeyedNested(nested))
}

fn unsupported(path: &str, value: &Value) -> ConfigurationError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "nested list",
        Value::Object(_) => "object",
    };
    ConfigurationError::UnsupportedShape {
        path: path.to_string(),
        found: found.to_string(),
    }
}
