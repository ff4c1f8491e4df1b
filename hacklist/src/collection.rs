use log::debug;

use crate::{Error, Record, Source, Value};

/// A collection is an ordered group of records of the same kind.
///
/// It is analogous to a table in a database. Record IDs are unique within a
/// collection.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    name: String,
    records: Vec<Record>,
}

impl Collection {
    /// Constructor for an empty collection.
    pub fn new<N: AsRef<str>>(name: N) -> Self {
        Self {
            name: name.as_ref().to_string(),
            records: Vec::new(),
        }
    }

    /// Build a collection from the given records, failing on duplicate IDs.
    pub fn from_records<N, I>(name: N, records: I) -> Result<Self, Error>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = Record>,
    {
        let mut collection = Self::new(name);
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }

    /// Build a collection from an array of maps.
    pub fn from_value<N: AsRef<str>>(name: N, value: Value) -> Result<Self, Error> {
        let name = name.as_ref();
        match value {
            Value::Array(items) => Self::from_records(
                name,
                items
                    .into_iter()
                    .map(Record::from_value)
                    .collect::<Result<Vec<Record>, Error>>()?,
            ),
            other => Err(Error::CollectionNotAnArray(
                name.to_string(),
                other.get_type(),
            )),
        }
    }

    /// Load all records produced by the given source.
    pub fn load<N: AsRef<str>>(name: N, source: &Source) -> Result<Self, Error> {
        let collection = Self::from_records(
            name,
            source.iter()?.collect::<Result<Vec<Record>, Error>>()?,
        )?;
        debug!(
            "Loaded {} record(s) into collection {} from {:?}",
            collection.len(),
            collection.name,
            source
        );
        Ok(collection)
    }

    /// Append a record, keeping IDs unique.
    pub fn insert(&mut self, record: Record) -> Result<(), Error> {
        if self.get(record.id()).is_some() {
            return Err(Error::DuplicateRecordId(
                self.name.clone(),
                record.id().to_string(),
            ));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a record by its ID. Numeric IDs match regardless of how they
    /// were written, so `1` finds a record loaded with ID `1` from any format.
    pub fn get(&self, id: &Value) -> Option<&Record> {
        self.records.iter().find(|r| r.id().loose_eq(id))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sorted, distinct scalar values found in the given field across
    /// all records. Array fields contribute each of their elements, which
    /// makes this suitable for building the choices of a field selector (e.g.
    /// every skill listed by any profile).
    pub fn distinct<F: AsRef<str>>(&self, field: F) -> Vec<Value> {
        let field = field.as_ref();
        let mut values: Vec<Value> = Vec::new();
        for value in self.records.iter().filter_map(|r| r.get(field)) {
            match value {
                Value::Array(items) => values.extend(items.iter().cloned()),
                Value::Map(_) | Value::Null => {}
                other => values.push(other.clone()),
            }
        }
        values.retain(|v| !matches!(v, Value::Array(_) | Value::Map(_) | Value::Null));
        values.sort_by(Value::compare);
        values.dedup_by(|a, b| a.loose_eq(b));
        values
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn profiles() -> Collection {
        let value = Value::try_from(json!([
            {"id": 1, "location": "Bangalore, India", "skills": ["React", "Node.js"]},
            {"id": 2, "location": "Mumbai, India", "skills": ["Java", "AWS"]},
            {"id": 3, "location": "Bangalore, India", "skills": ["React", "Vue.js"]},
        ]))
        .unwrap();
        Collection::from_value("profiles", value).unwrap()
    }

    #[test]
    fn lookup_by_id() {
        let c = profiles();
        assert_eq!(c.len(), 3);
        assert_eq!(
            c.get(&Value::Unsigned(2)).unwrap().get_str("location"),
            Some("Mumbai, India")
        );
        assert!(c.get(&Value::from("2")).is_none());
        assert!(c.get(&Value::Unsigned(9)).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut c = profiles();
        let err = c.insert(Record::new(1u64, Default::default())).unwrap_err();
        assert!(matches!(err, Error::DuplicateRecordId(name, id) if name == "profiles" && id == "1"));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn collections_load_from_arrays_only() {
        let err = Collection::from_value("events", Value::from("nope")).unwrap_err();
        assert!(matches!(err, Error::CollectionNotAnArray(_, _)));
    }

    #[test]
    fn distinct_values_flatten_arrays() {
        let c = profiles();
        assert_eq!(
            c.distinct("skills"),
            vec![
                Value::from("AWS"),
                Value::from("Java"),
                Value::from("Node.js"),
                Value::from("React"),
                Value::from("Vue.js"),
            ]
        );
        assert_eq!(
            c.distinct("location"),
            vec![Value::from("Bangalore, India"), Value::from("Mumbai, India")]
        );
        assert!(c.distinct("missing").is_empty());
    }
}
