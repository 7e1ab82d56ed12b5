//! FILENAME: core/row-loader/src/json_reader.rs

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use aggregation_tree::{log_enter, log_exit, log_warn, AggregationTree, Payload, Row};
use serde::de::DeserializeOwned;

use crate::LoadError;

/// Parses a JSON array of rows held in memory.
pub fn parse_json_rows<V: DeserializeOwned>(json: &str) -> Result<Vec<Row<V>>, LoadError> {
    serde_json::from_str(json).map_err(|e| reject(e.into()))
}

/// Reads a JSON array of rows from any reader.
pub fn read_json_rows<V, Rd>(reader: Rd) -> Result<Vec<Row<V>>, LoadError>
where
    V: DeserializeOwned,
    Rd: Read,
{
    serde_json::from_reader(reader).map_err(|e| reject(e.into()))
}

/// Reads a JSON array of rows from a file.
pub fn load_json_rows<V: DeserializeOwned>(path: &Path) -> Result<Vec<Row<V>>, LoadError> {
    log_enter!("LOADER", "load_json_rows", "path={}", path.display());
    let file = File::open(path).map_err(|e| reject(e.into()))?;
    let rows = read_json_rows(BufReader::new(file))?;
    log_exit!("LOADER", "load_json_rows", "rows={}", rows.len());
    Ok(rows)
}

/// Reads the rows in a JSON file and inserts them into `tree`.
///
/// Returns the number of inserted rows. Either every row is inserted or,
/// when one of them is invalid, none is.
pub fn load_json_into<V, R>(tree: &mut AggregationTree<V, R>, path: &Path) -> Result<usize, LoadError>
where
    V: DeserializeOwned + Payload + fmt::Debug,
{
    let rows: Vec<Row<V>> = load_json_rows(path)?;
    let count = rows.len();
    tree.load(rows).map_err(|e| reject(e.into()))?;
    Ok(count)
}

fn reject(err: LoadError) -> LoadError {
    log_warn!("LOADER", "{}", err);
    err
}
