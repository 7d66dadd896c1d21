//! Static service catalog.
//!
//! The catalog is read once from a YAML list of services and is immutable
//! afterwards:
//!
//! ```yaml
//! - id: iam
//!   name: IAM
//!   description: Manage User Access and Encryption Keys
//!   url: https://{domain}/iam/home#/home
//!   sections:
//!     - id: users
//!       name: Users
//!       url: https://{domain}/iam/home#/users
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::search::Candidate;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Catalog entry #{0} has an empty id")]
    EmptyId(usize),

    #[error("Duplicate service id in catalog: {0}")]
    DuplicateId(String),
}

/// A sub-page of a service console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Section {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl Candidate for Section {
    fn search_texts(&self) -> Vec<&str> {
        let mut texts = vec![self.display_name()];
        if self.name.is_some() {
            texts.push(&self.id);
        }
        texts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub extra_search_terms: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ServiceEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_name: None,
            description: String::new(),
            url: None,
            extra_search_terms: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections = sections.into_iter().collect();
        self
    }

    pub fn has_sections(&self) -> bool {
        !self.sections.is_empty()
    }

    /// Name shown to the user; falls back to the short name, then the id.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else {
            self.short_name.as_deref().unwrap_or(&self.id)
        }
    }
}

impl Candidate for ServiceEntry {
    fn search_texts(&self) -> Vec<&str> {
        let mut texts = vec![self.display_name(), self.id.as_str()];
        if let Some(short) = &self.short_name {
            texts.push(short);
        }
        texts.extend(self.extra_search_terms.iter().map(String::as_str));
        texts
    }
}

/// Ordered, id-indexed list of services.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<ServiceEntry>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting empty and duplicate ids.
    pub fn new(entries: Vec<ServiceEntry>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if entry.id.is_empty() {
                return Err(CatalogError::EmptyId(idx));
            }
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries, by_id })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let entries: Vec<ServiceEntry> = serde_yaml::from_str(yaml)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), services = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, id: &str) -> Option<&ServiceEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
