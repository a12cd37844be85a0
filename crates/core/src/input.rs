//! Input interface from the external file parsers.
//!
//! The parsers turn concrete pathway-diagram or quantitative-model files
//! into per-entity lists of raw annotation strings; this module defines
//! the JSON shape the pipeline consumes. No ordering is assumed.

use crate::entity::Corpus;
use serde::{Deserialize, Serialize};

/// One parsed entity: local id, optional display label, and the raw
/// annotation resource strings isolated from the file's markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEntity {
    #[serde(alias = "id")]
    pub local_id: String,

    #[serde(default, alias = "name")]
    pub label: Option<String>,

    /// Raw resource strings, typically identifiers.org URIs
    #[serde(default, alias = "resources")]
    pub annotations: Vec<String>,
}

/// All entities parsed from one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFile {
    #[serde(alias = "file")]
    pub source_file: String,

    pub corpus: Corpus,

    #[serde(default)]
    pub entities: Vec<ParsedEntity>,
}

impl ParsedFile {
    /// Parse a file dump from JSON. Accepts either a single file object
    /// or an array of them.
    pub fn from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        if let Ok(file) = serde_json::from_str::<ParsedFile>(json) {
            return Ok(vec![file]);
        }
        serde_json::from_str::<Vec<ParsedFile>>(json)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
