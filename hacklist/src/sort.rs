use std::{cmp::Ordering, str::FromStr};

use crate::{Error, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Sort records by the value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    field: String,
    order: SortOrder,
}

impl SortKey {
    pub fn ascending<F: AsRef<str>>(field: F) -> Self {
        Self {
            field: field.as_ref().to_string(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending<F: AsRef<str>>(field: F) -> Self {
        Self {
            field: field.as_ref().to_string(),
            order: SortOrder::Descending,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Compare two records by this key. Records lacking the field always
    /// come last, whatever the order.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (a.get(&self.field), b.get(&self.field)) {
            (Some(x), Some(y)) => match self.order {
                SortOrder::Ascending => x.compare(y),
                SortOrder::Descending => y.compare(x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Parses `FIELD`, `FIELD:asc` or `FIELD:desc`.
impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = match s.rsplit_once(':') {
            Some((field, order)) => (field, order),
            None => (s, "asc"),
        };
        let field = field.trim();
        if field.is_empty() {
            return Err(Error::InvalidSortKey(s.to_string()));
        }
        match order.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::ascending(field)),
            "desc" => Ok(Self::descending(field)),
            _ => Err(Error::InvalidSortKey(s.to_string())),
        }
    }
}

/// Stable in-place sort by the given keys, earlier keys taking priority.
pub fn sort(records: &mut [&Record], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Map, Value};

    fn event(id: i32, date: &str, location: &str) -> Record {
        Record::new(id, Map::new())
            .with("date", date)
            .with("location", location)
    }

    fn ids(records: &[&Record]) -> Vec<Value> {
        records.iter().map(|r| r.id().clone()).collect()
    }

    #[test]
    fn sorting_is_stable() {
        let events = vec![
            event(1, "2023-12-02", "Delhi"),
            event(2, "2023-10-15", "Pune"),
            event(3, "2023-12-02", "Agra"),
        ];
        let mut refs = events.iter().collect::<Vec<&Record>>();
        sort(&mut refs, &[SortKey::ascending("date")]);
        assert_eq!(ids(&refs), vec![Value::from(2), Value::from(1), Value::from(3)]);

        sort(
            &mut refs,
            &[SortKey::descending("date"), SortKey::ascending("location")],
        );
        assert_eq!(ids(&refs), vec![Value::from(3), Value::from(1), Value::from(2)]);
    }

    #[test]
    fn missing_fields_sort_last() {
        let events = vec![
            Record::new(1, Map::new()),
            event(2, "2023-10-15", "Pune"),
            event(3, "2024-01-20", "Delhi"),
        ];
        let mut refs = events.iter().collect::<Vec<&Record>>();
        sort(&mut refs, &[SortKey::descending("date")]);
        assert_eq!(ids(&refs), vec![Value::from(3), Value::from(2), Value::from(1)]);
        sort(&mut refs, &[SortKey::ascending("date")]);
        assert_eq!(ids(&refs), vec![Value::from(2), Value::from(3), Value::from(1)]);
    }

    #[test]
    fn parse_sort_keys() {
        assert_eq!(SortKey::from_str("date").unwrap(), SortKey::ascending("date"));
        assert_eq!(
            SortKey::from_str("date:DESC").unwrap(),
            SortKey::descending("date")
        );
        assert!(SortKey::from_str("date:sideways").is_err());
        assert!(SortKey::from_str(":asc").is_err());
    }
}
