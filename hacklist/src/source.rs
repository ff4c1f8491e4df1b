//! Data source handling.

use std::collections::VecDeque;
use std::path::Path;

use glob::Paths;
use log::{debug, trace};

use crate::record::ID_FIELD;
use crate::{Error, Record, Value};

/// An iterator producing elements of type `Result<Record, Error>` that are
/// read from a particular data source.
pub enum SourceIter {
    Files {
        paths: Paths,
        // Records read from the current file but not yet yielded.
        pending: VecDeque<Record>,
    },
}

impl Iterator for SourceIter {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SourceIter::Files { paths, pending } => loop {
                if let Some(record) = pending.pop_front() {
                    return Some(Ok(record));
                }
                let next_path = match paths.next()? {
                    Ok(p) => p,
                    Err(e) => return Some(Err(Error::SourceIter(e))),
                };
                if !next_path.is_file() {
                    trace!("Skipping non-file {}", next_path.display());
                    continue;
                }
                match load_records(&next_path) {
                    Ok(records) => pending.extend(records),
                    Err(e) => return Some(Err(e)),
                }
            },
        }
    }
}

/// A source of records that can be loaded into a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// One or more files from the local file system.
    ///
    /// The parameter can specify a glob-style pattern for matching files.
    /// Each file holds either a single record (a map) or an array of them.
    Files(String),
}

impl Source {
    /// Returns an iterator that allows one to iterate through records parsed
    /// from the source as they are read.
    ///
    /// Can fail if this source has been incorrectly configured.
    pub fn iter(&self) -> Result<SourceIter, Error> {
        Ok(match self {
            Self::Files(pattern) => glob::glob(pattern)
                .map(|paths| SourceIter::Files {
                    paths,
                    pending: VecDeque::new(),
                })
                .map_err(|e| Error::SourceFilePattern(pattern.clone(), e))?,
        })
    }
}

// A single map becomes one record, with its ID defaulting to the file stem.
// An array yields one record per element, each of which needs its own ID.
fn load_records(path: &Path) -> Result<Vec<Record>, Error> {
    debug!("Loading records from {}", path.display());
    let value = Value::load_from_file(path)?;
    let records = match value {
        Value::Map(mut fields) => {
            if !fields.contains_key(ID_FIELD) {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| Error::CannotDetermineFileType(path.to_path_buf()))?;
                fields.insert(ID_FIELD.to_string(), Value::from(stem));
            }
            vec![Record::from_value(Value::Map(fields))?]
        }
        Value::Array(items) => items
            .into_iter()
            .map(Record::from_value)
            .collect::<Result<Vec<Record>, Error>>()
            .map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))?,
        other => {
            return Err(Error::LoadFromFile(
                path.to_path_buf(),
                Box::new(Error::RecordNotAMap(other.get_type())),
            ))
        }
    };
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hacklist-source-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_single_and_array_files() {
        let dir = scratch_dir("mixed");
        fs::write(
            dir.join("hackpune.yaml"),
            "name: HackPune\nlocation: Pune, India\n",
        )
        .unwrap();
        fs::write(
            dir.join("more.json"),
            r#"[{"id": 10, "name": "A"}, {"id": 11, "name": "B"}]"#,
        )
        .unwrap();
        fs::create_dir_all(dir.join("nested.json")).unwrap();

        let pattern = format!("{}/*", dir.display());
        let mut records = Source::Files(pattern)
            .iter()
            .unwrap()
            .collect::<Result<Vec<Record>, Error>>()
            .unwrap();
        records.sort_by(|a, b| a.id().compare(b.id()));
        let ids = records.iter().map(|r| r.id().clone()).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![Value::from(10), Value::from(11), Value::from("hackpune")]
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn array_elements_need_ids() {
        let dir = scratch_dir("noids");
        fs::write(dir.join("events.json"), r#"[{"name": "A"}]"#).unwrap();
        let pattern = format!("{}/*.json", dir.display());
        let result = Source::Files(pattern).iter().unwrap().next().unwrap();
        assert!(matches!(result, Err(Error::LoadFromFile(_, _))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_patterns_are_reported() {
        assert!(matches!(
            Source::Files("[".to_string()).iter(),
            Err(Error::SourceFilePattern(_, _))
        ));
    }
}
