//! YAML parser for endpoint definitions
//!
//! Parses and validates endpoint YAML files.
//! Supports both built-in endpoints (by name) and custom YAML files (by path).

use crate::endpoints;
use crate::error::{Error, Result, ResultExt};
use crate::loader::types::{
    Definition, FetchDefinition, HistoryDefinition, Metadata, RequestDefinition,
    SnapshotDefinition,
};
use crate::output::ColumnSpec;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load an endpoint definition from a name or file path
///
/// Built-in names (e.g. `a-share-spot`) are resolved first, then the input is
/// read as a file path.
///
/// # Examples
///
/// ```ignore
/// let spot = load_definition("a-share-spot")?;
/// let custom = load_definition("./my-endpoint.yaml")?;
/// ```
pub fn load_definition(name_or_path: impl AsRef<Path>) -> Result<Definition> {
    let path = name_or_path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = endpoints::get_builtin(&path_str) {
            return load_definition_from_str(yaml);
        }
    }

    let content = match fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::config(format!(
                "Endpoint '{}' not found. Built-in endpoints: {}. Or provide a path to a YAML file.",
                path.display(),
                endpoints::list_builtin().join(", ")
            )))
        }
        read => read.with_context(|| format!("Failed to read endpoint file '{}'", path.display()))?,
    };
    load_definition_from_str(&content)
}

/// Load an endpoint definition from a YAML string
pub fn load_definition_from_str(yaml: &str) -> Result<Definition> {
    let def: Definition = serde_yaml::from_str(yaml)?;
    validate_definition(&def)?;
    Ok(def)
}

/// Validate an endpoint definition
pub fn validate_definition(def: &Definition) -> Result<()> {
    match def {
        Definition::Snapshot(snapshot) => validate_snapshot(snapshot),
        Definition::History(history) => validate_history(history),
    }
}

fn validate_snapshot(def: &SnapshotDefinition) -> Result<()> {
    validate_metadata(&def.metadata)?;
    validate_request(&def.request)?;
    validate_fetch(&def.fetch)?;

    if def.request.page_param.trim().is_empty() {
        return Err(Error::invalid_value("request.page_param", "cannot be empty"));
    }
    if def.envelope.records_path.trim().is_empty() {
        return Err(Error::invalid_value("envelope.records_path", "cannot be empty"));
    }
    if def.envelope.total_path.trim().is_empty() {
        return Err(Error::invalid_value("envelope.total_path", "cannot be empty"));
    }
    if def.ranking.sort_key.trim().is_empty() {
        return Err(Error::invalid_value("ranking.sort_key", "cannot be empty"));
    }
    if def.ranking.rank_field.trim().is_empty() {
        return Err(Error::invalid_value("ranking.rank_field", "cannot be empty"));
    }

    validate_columns(&def.columns)
}

fn validate_history(def: &HistoryDefinition) -> Result<()> {
    validate_metadata(&def.metadata)?;
    validate_request(&def.request)?;
    validate_fetch(&def.fetch)?;

    if def.records_path.trim().is_empty() {
        return Err(Error::invalid_value("records_path", "cannot be empty"));
    }
    if def.fields.is_empty() {
        return Err(Error::invalid_value("fields", "must name at least one field"));
    }
    let unique: HashSet<_> = def.fields.iter().collect();
    if unique.len() != def.fields.len() {
        return Err(Error::invalid_value("fields", "duplicate field names found"));
    }

    validate_columns(&def.columns)
}

fn validate_metadata(metadata: &Metadata) -> Result<()> {
    if metadata.name.trim().is_empty() {
        return Err(Error::invalid_value("metadata.name", "cannot be empty"));
    }
    Ok(())
}

fn validate_request(request: &RequestDefinition) -> Result<()> {
    url::Url::parse(&request.url)?;
    Ok(())
}

fn validate_fetch(fetch: &FetchDefinition) -> Result<()> {
    if fetch.timeout_secs == 0 {
        return Err(Error::invalid_value("fetch.timeout_secs", "must be greater than 0"));
    }
    if fetch.concurrency == 0 {
        return Err(Error::invalid_value("fetch.concurrency", "must be at least 1"));
    }
    if let Some(limit) = &fetch.rate_limit {
        if limit.requests_per_second == 0 {
            return Err(Error::invalid_value(
                "fetch.rate_limit.requests_per_second",
                "must be at least 1",
            ));
        }
    }
    Ok(())
}

fn validate_columns(columns: &[ColumnSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.source.trim().is_empty() || column.name.trim().is_empty() {
            return Err(Error::invalid_value(
                "columns",
                "source and name cannot be empty",
            ));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(Error::invalid_value(
                "columns",
                format!("duplicate column name '{}'", column.name),
            ));
        }
    }
    Ok(())
}
