//! CLI command implementations
//!
//! Each command loads the data file into an in-memory registry, does its
//! work and returns the JSON to print. Printing happens in [`run`] only.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::collection::CollectionRegistry;
use crate::config::SearchConfig;
use crate::observability::Logger;
use crate::query::RequestParams;
use crate::search::SearchEngine;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Data file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    /// Collection name -> documents
    pub collections: BTreeMap<String, Vec<Value>>,
}

impl Dataset {
    /// Load a data file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::data_error(format!("Failed to read data file {:?}: {}", path, e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::data_error(format!("Invalid data JSON: {}", e)))
    }

    /// Builds a registry holding one collection per entry
    pub fn into_registry(self) -> CliResult<Arc<CollectionRegistry>> {
        let registry = Arc::new(CollectionRegistry::new());
        for (name, docs) in self.collections {
            registry.create(&name).add_all(docs)?;
        }
        Ok(registry)
    }
}

/// Main CLI entry point
///
/// Parses arguments, runs the command and prints its JSON. Errors are
/// printed as JSON too and then returned so the process exits non-zero.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Query {
            data,
            collection,
            params,
            config,
            quiet,
        } => {
            Logger::set_enabled(!quiet);
            query(&data, &collection, &params, config.as_deref())
        }
        Command::Collections { data } => collections(&data),
    }
}

/// Runs one search against a data file
pub fn query(
    data_path: &Path,
    collection: &str,
    raw_params: &[String],
    config_path: Option<&Path>,
) -> CliResult<Value> {
    let config = match config_path {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    let params = parse_params(raw_params)?;
    let registry = Dataset::load(data_path)?.into_registry()?;

    let engine = SearchEngine::new(registry, config);
    let response = engine.search(collection, &params)?;
    Ok(response.to_json())
}

/// Lists collections in a data file
pub fn collections(data_path: &Path) -> CliResult<Value> {
    let registry = Dataset::load(data_path)?.into_registry()?;

    let entries: Vec<Value> = registry
        .names()
        .into_iter()
        .filter_map(|name| {
            let count = registry.get(&name)?.len();
            Some(json!({"name": name, "documents": count}))
        })
        .collect();

    Ok(json!({ "collections": entries }))
}

/// Parses `key=value` arguments; the value may itself contain `=`
pub fn parse_params(raw: &[String]) -> CliResult<RequestParams> {
    let mut params = RequestParams::new();
    for arg in raw {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            CliError::invalid_argument(format!("expected key=value, got '{}'", arg))
        })?;
        if key.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "empty parameter name in '{}'",
                arg
            )));
        }
        params.insert(key, value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&[
            "q={!join from=a to=b v=$qq}".to_string(),
            "qq=name:dave".to_string(),
            "fq=x:1".to_string(),
            "fq=y:2".to_string(),
        ])
        .unwrap();
        assert_eq!(params.get("q"), Some("{!join from=a to=b v=$qq}"));
        assert_eq!(params.get_all("fq").len(), 2);
    }

    #[test]
    fn test_parse_params_rejects() {
        let err = parse_params(&["novalue".to_string()]).unwrap_err();
        assert_eq!(err.code_str(), "AERO_CLI_INVALID_ARGUMENT");
        let err = parse_params(&["=x".to_string()]).unwrap_err();
        assert_eq!(err.code_str(), "AERO_CLI_INVALID_ARGUMENT");
    }

    #[test]
    fn test_dataset_into_registry() {
        let dataset: Dataset = serde_json::from_value(json!({
            "collections": {
                "people": [{"id": "1"}, {"id": "2"}],
                "depts": []
            }
        }))
        .unwrap();
        let registry = dataset.into_registry().unwrap();
        assert_eq!(registry.names(), vec!["depts", "people"]);
        assert_eq!(registry.get("people").unwrap().len(), 2);
    }

    #[test]
    fn test_dataset_rejects_bad_document() {
        let dataset: Dataset = serde_json::from_value(json!({
            "collections": {"people": [{"name": "no id"}]}
        }))
        .unwrap();
        let err = dataset.into_registry().unwrap_err();
        assert_eq!(err.code_str(), "AERO_CLI_DATA_ERROR");
    }
}
