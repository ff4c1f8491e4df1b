//! Configuration-related functionality for Hacklist.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    maybe_canonicalize, CollectionKind, Error, PageWindow, SortKey, Source, SupportedFormat,
};

/// Listing settings for a single collection. Unset values fall back to the
/// defaults of the collection kind.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct CollectionConfig {
    /// Glob pattern of data files. The built-in data is used when unset.
    pub source: Option<String>,
    /// Fields searched by the free-text query.
    pub search_fields: Option<Vec<String>>,
    pub page_size: Option<usize>,
    /// Default sort keys, e.g. `["date:asc"]`.
    pub sort: Option<Vec<String>>,
}

/// Hacklist configuration.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub events: CollectionConfig,
    pub profiles: CollectionConfig,
}

impl Config {
    /// Load configuration from a JSON, YAML or TOML file, chosen by the
    /// file's extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let fmt = SupportedFormat::from_path(path)?;
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("while trying to read from {}", path.display()), e))?;
        let config = match fmt {
            SupportedFormat::Json => serde_json::from_str(&content)?,
            SupportedFormat::Yaml => serde_yaml::from_str(&content)?,
            SupportedFormat::Toml => toml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Load configuration from the given file if it exists, otherwise use
    /// the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        match maybe_canonicalize(path)? {
            Some(config_path) => {
                let config = Self::load_from_file(&config_path)
                    .map_err(|e| Error::LoadFromFile(config_path.clone(), Box::new(e)))?;
                debug!("Loaded configuration from {}", config_path.display());
                Ok(config)
            }
            None => {
                debug!(
                    "No such configuration file, using defaults: {}",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }

    /// Convenience method for configuring a collection's data source.
    pub fn with_source<P: AsRef<str>>(mut self, kind: CollectionKind, pattern: P) -> Self {
        self.collection_mut(kind).source = Some(pattern.as_ref().to_string());
        self
    }

    /// Convenience method for configuring a collection's page size.
    pub fn with_page_size(mut self, kind: CollectionKind, page_size: usize) -> Self {
        self.collection_mut(kind).page_size = Some(page_size);
        self
    }

    /// Convenience method for configuring a collection's searchable fields.
    pub fn with_search_fields<I, S>(mut self, kind: CollectionKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.collection_mut(kind).search_fields =
            Some(fields.into_iter().map(|f| f.as_ref().to_string()).collect());
        self
    }

    pub fn collection(&self, kind: CollectionKind) -> &CollectionConfig {
        match kind {
            CollectionKind::Events => &self.events,
            CollectionKind::Profiles => &self.profiles,
        }
    }

    fn collection_mut(&mut self, kind: CollectionKind) -> &mut CollectionConfig {
        match kind {
            CollectionKind::Events => &mut self.events,
            CollectionKind::Profiles => &mut self.profiles,
        }
    }

    pub fn source(&self, kind: CollectionKind) -> Option<Source> {
        self.collection(kind).source.clone().map(Source::Files)
    }

    pub fn search_fields(&self, kind: CollectionKind) -> Vec<String> {
        self.collection(kind)
            .search_fields
            .clone()
            .unwrap_or_else(|| {
                kind.default_search_fields()
                    .iter()
                    .map(|f| f.to_string())
                    .collect()
            })
    }

    pub fn page_size(&self, kind: CollectionKind) -> usize {
        self.collection(kind)
            .page_size
            .unwrap_or_else(|| kind.default_page_size())
    }

    /// The first page of the configured size. Fails if the configured size
    /// is zero.
    pub fn first_page(&self, kind: CollectionKind) -> Result<PageWindow, Error> {
        PageWindow::first(self.page_size(kind))
    }

    pub fn sort_keys(&self, kind: CollectionKind) -> Result<Vec<SortKey>, Error> {
        self.collection(kind)
            .sort
            .iter()
            .flatten()
            .map(|s| s.parse())
            .collect()
    }
}
