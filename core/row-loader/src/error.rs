//! FILENAME: core/row-loader/src/error.rs

use aggregation_tree::TreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error parsing the input json: {0}")]
    Parse(String),

    #[error("Error mapping the input json to rows: {0}")]
    Mapping(String),

    #[error("Problem loading the input json, make sure it exists at the provided path: {0}")]
    Io(#[from] std::io::Error),

    #[error("Loaded rows were rejected by the tree: {0}")]
    Tree(#[from] TreeError),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match e.classify() {
            Category::Io => LoadError::Io(e.into()),
            Category::Syntax | Category::Eof => LoadError::Parse(e.to_string()),
            Category::Data => LoadError::Mapping(e.to_string()),
        }
    }
}
