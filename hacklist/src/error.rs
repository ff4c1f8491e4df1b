use std::path::PathBuf;

use thiserror::Error;

use crate::ValueType;

/// The primary error type that can be produced by Hacklist.
#[derive(Debug, Error)]
pub enum Error {
    #[error("page size must be greater than zero, but got {0}")]
    InvalidPageSize(i64),
    #[error("invalid sort key \"{0}\": expected FIELD, FIELD:asc or FIELD:desc")]
    InvalidSortKey(String),
    #[error("unknown collection \"{0}\": expected \"events\" or \"profiles\"")]
    UnknownCollection(String),
    #[error("object property names must be strings")]
    ObjectKeysMustBeStrings,
    #[error("number {0} cannot be represented as a fixed-point value")]
    NumberOutOfRange(f64),
    #[error("I/O error {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to load data from file {0}: {1}")]
    LoadFromFile(PathBuf, Box<Error>),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("cannot determine file type of file: {0}")]
    CannotDetermineFileType(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
    #[error("source files iteration failed: {0}")]
    SourceIter(#[from] glob::GlobError),
    #[error("failed to parse source file pattern \"{0}\": {1}")]
    SourceFilePattern(String, glob::PatternError),
    #[error("records must be maps, but got a value of type {0}")]
    RecordNotAMap(ValueType),
    #[error("record has no \"id\" field")]
    MissingRecordId,
    #[error("duplicate record ID {1} in collection \"{0}\"")]
    DuplicateRecordId(String, String),
    #[error("collection \"{0}\" must be loaded from an array of records, but got a value of type {1}")]
    CollectionNotAnArray(String, ValueType),
    #[error("invalid date \"{0}\": {1}")]
    InvalidDate(String, time::error::Parse),
    #[error("invalid date format description \"{0}\": {1}")]
    InvalidDateFormat(String, time::error::InvalidFormatDescription),
    #[error("failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
}
