//! # Library Manager Module
//!
//! ## Purpose
//! Loads the JSON libraries (elements, curated reactions, lessons) the stores are built
//! from. Every library ships inside the binary; the configuration may point any of them
//! at a file on disk instead, which lets a deployment swap in a larger element table or
//! its own reaction set without rebuilding.
//!
//! ## Library Format
//! Each library is a JSON array of records in the same camelCase shape the HTTP API
//! returns, e.g. `data/reactions.json`:
//! ```json
//! [
//!   { "reactants": ["H", "O"], "product": "H₂O", "productName": "Water", ... }
//! ]
//! ```
//!
//! ## Error Reporting
//! Parse failures are logged with the offending line and a caret under the failing
//! column before the error is returned.

use crate::chemistry::elements::Element;
use crate::chemistry::lessons::Lesson;
use crate::chemistry::reactions::Reaction;
use crate::chemistry::storage::{ChemStore, StoreError};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const EMBEDDED_ELEMENTS: &str = include_str!("../data/elements.json");
const EMBEDDED_REACTIONS: &str = include_str!("../data/reactions.json");
const EMBEDDED_LESSONS: &str = include_str!("../data/lessons.json");

/// Optional on-disk replacements for the embedded libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryPaths {
    pub elements: Option<PathBuf>,
    pub reactions: Option<PathBuf>,
    pub lessons: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read library file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error parsing {library} library at line {line}, column {column}: {source}")]
    Parse {
        library: String,
        line: usize,
        column: usize,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
pub struct LibraryManager {
    paths: LibraryPaths,
}

impl LibraryManager {
    /// manager that only uses the libraries compiled into the binary
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn with_paths(paths: LibraryPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    pub fn load_elements(&self) -> Result<Vec<Element>, LibraryError> {
        load_library("elements", self.paths.elements.as_deref(), EMBEDDED_ELEMENTS)
    }

    pub fn load_reactions(&self) -> Result<Vec<Reaction>, LibraryError> {
        load_library("reactions", self.paths.reactions.as_deref(), EMBEDDED_REACTIONS)
    }

    pub fn load_lessons(&self) -> Result<Vec<Lesson>, LibraryError> {
        load_library("lessons", self.paths.lessons.as_deref(), EMBEDDED_LESSONS)
    }

    /// Loads all three libraries and builds the validated stores.
    pub fn build_store(&self) -> Result<ChemStore, LibraryError> {
        let store = ChemStore::from_records(
            self.load_elements()?,
            self.load_reactions()?,
            self.load_lessons()?,
        )?;
        info!(
            "Stores ready: {} elements, {} reactions, {} lessons",
            store.elements.len(),
            store.reactions.len(),
            store.lessons.len()
        );
        Ok(store)
    }
}

fn load_library<T: DeserializeOwned>(
    library: &str,
    path: Option<&Path>,
    embedded: &str,
) -> Result<Vec<T>, LibraryError> {
    let records = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| LibraryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let records = parse_library(library, &text)?;
            info!(
                "Loaded {} library from '{}' ({} records)",
                library,
                path.display(),
                records.len()
            );
            records
        }
        None => parse_library(library, embedded)?,
    };
    if records.is_empty() {
        warn!("Library '{}' contains no records", library);
    }
    Ok(records)
}

fn parse_library<T: DeserializeOwned>(library: &str, text: &str) -> Result<Vec<T>, LibraryError> {
    serde_json::from_str(text).map_err(|source| {
        let (line, column) = (source.line(), source.column());
        error!(
            "Error parsing {} library at line {}, column {}: {}",
            library, line, column, source
        );
        if let Some(problem_line) = text.lines().nth(line.saturating_sub(1)) {
            error!("Problematic line: {}", problem_line);
            if column >= 1 && column <= problem_line.len() {
                error!("{}^", " ".repeat(column - 1));
            }
        }
        LibraryError::Parse {
            library: library.to_string(),
            line,
            column,
            source,
        }
    })
}
